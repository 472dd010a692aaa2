//! Core engine: turns unified-diff text into suggestion diagnostics.
//!
//! The pipeline is split → scan (in `diffsuggest-diff`) → build (here).
//! Everything is I/O-free except [`DiffParser::parse_reader`], which only
//! reads the caller's stream.

mod builder;
mod cancel;
mod error;
mod parser;
mod render;
mod sarif;

pub use builder::{diagnostics_for_file, diagnostics_for_hunk, HunkReducer};
pub use cancel::CancelToken;
pub use error::{ErrorKind, ParseError};
pub use parser::DiffParser;
pub use render::{render_markdown, render_rdjson, render_rdjsonl, render_text};
pub use sarif::{render_sarif_json, render_sarif_report, SarifReport};

pub use diffsuggest_diff::{DiffFile, DiffLine, FileStatus, Hunk, LineKind};
