//! Proptest strategies for generating valid test inputs.
//!
//! Strategies are constructive: every generated hunk body is well formed
//! and its header counts match the body.
//!
//! # Bounds
//!
//! To keep tests fast, the following bounds are enforced:
//! - Max files per diff: 5
//! - Max hunks per file: 5
//! - Max lines per hunk: 20
//! - Max line length: 200 bytes

use diffsuggest_types::{Diagnostic, Location, Position, Range, Suggestion};
use proptest::prelude::*;

use crate::diff_builder::{DiffBuilder, FileBuilder, HunkBuilder, HunkLine};

// =============================================================================
// Constants for bounding generated data
// =============================================================================

/// Maximum number of files in a generated diff
pub const MAX_FILES: usize = 5;

/// Maximum number of hunks per file
pub const MAX_HUNKS_PER_FILE: usize = 5;

/// Maximum number of lines per hunk
pub const MAX_LINES_PER_HUNK: usize = 20;

/// Maximum line length in bytes
pub const MAX_LINE_LENGTH: usize = 200;

// =============================================================================
// Path and line strategies
// =============================================================================

/// Strategy for a relative file path such as `src/foo/bar.rs`.
pub fn arb_file_path() -> impl Strategy<Value = String> {
    let segment = "[a-z][a-z0-9_]{0,8}";
    let ext = prop_oneof![
        Just("rs"),
        Just("go"),
        Just("py"),
        Just("txt"),
        Just("md"),
    ];
    (prop::collection::vec(segment, 0..3), "[a-z][a-z0-9_]{0,8}", ext).prop_map(
        |(dirs, stem, ext)| {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&stem);
            path.push('.');
            path.push_str(ext);
            path
        },
    )
}

/// Strategy for the content of one diff body line (no newline, no CR).
pub fn arb_line_content() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_(){}\\[\\];:,.=+\\-*/<>\"' \t]{0,60}"
}

/// Strategy for `k` distinct-looking lines of content.
pub fn arb_lines(k: std::ops::Range<usize>) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_line_content(), k)
}

// =============================================================================
// Hunk strategies
// =============================================================================

/// Strategy for a single non-notice body line.
pub fn arb_hunk_line() -> impl Strategy<Value = HunkLine> {
    prop_oneof![
        2 => arb_line_content().prop_map(HunkLine::Context),
        1 => arb_line_content().prop_map(HunkLine::Add),
        1 => arb_line_content().prop_map(HunkLine::Remove),
    ]
}

/// Strategy for a hunk body made only of context lines.
pub fn arb_context_only_body() -> impl Strategy<Value = Vec<HunkLine>> {
    prop::collection::vec(arb_line_content().prop_map(HunkLine::Context), 1..MAX_LINES_PER_HUNK)
}

/// Strategy for a mixed hunk body of 1..=MAX_LINES_PER_HUNK lines.
pub fn arb_hunk_body() -> impl Strategy<Value = Vec<HunkLine>> {
    prop::collection::vec(arb_hunk_line(), 1..=MAX_LINES_PER_HUNK)
}

/// A hunk body with its start lines.
#[derive(Debug, Clone)]
pub struct HunkSpec {
    pub old_start: u32,
    pub new_start: u32,
    pub body: Vec<HunkLine>,
}

impl HunkSpec {
    pub fn builder(&self) -> HunkBuilder {
        HunkBuilder::from_lines(self.old_start, self.new_start, self.body.clone())
    }
}

/// Strategy for a hunk with positive start lines and a mixed body.
pub fn arb_hunk_spec() -> impl Strategy<Value = HunkSpec> {
    (1u32..500, 1u32..500, arb_hunk_body()).prop_map(|(old_start, new_start, body)| HunkSpec {
        old_start,
        new_start,
        body,
    })
}

/// A generated multi-file diff plus the paths it touches, in order.
#[derive(Debug, Clone)]
pub struct DiffSpec {
    pub files: Vec<(String, Vec<HunkSpec>)>,
}

impl DiffSpec {
    pub fn build(&self) -> String {
        let mut diff = DiffBuilder::new();
        for (path, hunks) in &self.files {
            let mut file = FileBuilder::new(path);
            for h in hunks {
                file = file.add_hunk(h.builder());
            }
            diff = diff.add_file(file);
        }
        diff.build()
    }
}

/// Strategy for a diff of 1..=MAX_FILES files with ordered, non-overlapping hunks.
pub fn arb_diff_spec() -> impl Strategy<Value = DiffSpec> {
    prop::collection::vec(
        (
            arb_file_path(),
            prop::collection::vec(arb_hunk_body(), 1..=MAX_HUNKS_PER_FILE),
        ),
        1..=MAX_FILES,
    )
    .prop_map(|files| DiffSpec {
        files: files
            .into_iter()
            .map(|(path, bodies)| (path, place_hunks(bodies)))
            .collect(),
    })
}

/// Lay bodies out top to bottom with a gap of 10 lines between hunks.
fn place_hunks(bodies: Vec<Vec<HunkLine>>) -> Vec<HunkSpec> {
    let mut old_start = 1u32;
    let mut new_start = 1u32;
    let mut out = Vec::with_capacity(bodies.len());
    for body in bodies {
        let spec = HunkSpec {
            old_start,
            new_start,
            body,
        };
        let (old, new) = spec.builder().body_counts();
        old_start += old + 10;
        new_start += new + 10;
        out.push(spec);
    }
    out
}

// =============================================================================
// Diagnostic strategies
// =============================================================================

/// Strategy for a well-formed line range.
pub fn arb_range() -> impl Strategy<Value = Range> {
    prop_oneof![
        (1u32..10_000, 0u32..20).prop_map(|(start, span)| Range::lines(start, start + span)),
        (1u32..10_000).prop_map(|line| Range::point(Position::with_column(line, 1))),
    ]
}

/// Strategy for a diagnostic with a single suggestion.
pub fn arb_diagnostic() -> impl Strategy<Value = Diagnostic> {
    (
        arb_file_path(),
        arb_range(),
        prop::option::of(arb_line_content()),
        arb_line_content(),
    )
        .prop_map(|(path, range, text, original_output)| Diagnostic {
            location: Location {
                path,
                range,
            },
            suggestions: vec![Suggestion { range, text }],
            original_output,
        })
}
