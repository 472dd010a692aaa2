//! Unified diff parsing.
//!
//! This crate splits `git diff` style unified diffs into per-file sections
//! and scans each section into typed hunks. It does no I/O and knows nothing
//! about diagnostics; `diffsuggest-core` builds those on top.

mod error;
mod hunk;
mod model;
mod path;
mod reader;
mod split;

pub use error::DiffParseError;
pub use hunk::{parse_hunk_header, HunkHeader};
pub use model::{DiffFile, DiffLine, FileStatus, Hunk, LineKind};
pub use path::{strip_path, DEV_NULL};
pub use split::{split_files, FileSections};
