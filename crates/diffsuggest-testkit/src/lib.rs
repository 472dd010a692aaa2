//! Shared test utilities for the diffsuggest workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for generating valid diffs and diagnostics
//! - **diff_builder**: Unified diff builders for constructing test diffs
//! - **schema**: JSON schema validators for DTOs
//! - **fixtures**: Common test fixtures (sample diffs, runner configs, expected diagnostics)
//!
//! # Example
//!
//! ```rust,ignore
//! use diffsuggest_testkit::arb;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     fn test_diff(spec in arb::arb_diff_spec()) {
//!         let diff = spec.build();
//!         assert!(diff.starts_with("diff --git "));
//!     }
//! }
//! ```

pub mod arb;
pub mod diff_builder;
pub mod fixtures;
pub mod schema;

// Re-export commonly used items
pub use arb::{arb_diagnostic, arb_diff_spec, arb_file_path, arb_hunk_spec, arb_line_content};
pub use diff_builder::{DiffBuilder, FileBuilder, HunkBuilder, HunkLine};
pub use fixtures::{expected, sample_configs, sample_diffs};
pub use schema::{validate_diagnostic, validate_diagnostic_json, validate_diagnostic_result_json};
