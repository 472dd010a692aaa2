/// Errors produced while splitting or scanning a unified diff.
///
/// Line numbers are 1-based positions in the raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffParseError {
    #[error("line {line}: malformed hunk header: {header}")]
    MalformedHunkHeader { line: usize, header: String },

    #[error("line {line}: malformed file header: {header}")]
    MalformedFileHeader { line: usize, header: String },

    #[error("line {line}: hunk header appears before any file header")]
    HunkBeforeFileHeader { line: usize },

    #[error("line {line}: old-file header is not followed by a new-file header")]
    MissingNewFileHeader { line: usize },

    #[error("line {line}: unexpected line inside hunk: {content:?}")]
    UnexpectedHunkLine { line: usize, content: String },

    #[error("line {line}: \"\\ No newline at end of file\" has no preceding content line")]
    OrphanNoNewlineMarker { line: usize },

    #[error(
        "line {line}: hunk declares -{old_expected} +{new_expected} lines \
         but its body has -{old_seen} +{new_seen} at this point"
    )]
    CountMismatch {
        line: usize,
        old_expected: u32,
        new_expected: u32,
        old_seen: u32,
        new_seen: u32,
    },

    #[error(
        "input ends at line {line} inside a hunk: \
         {old_remaining} old and {new_remaining} new lines missing"
    )]
    Truncated {
        line: usize,
        old_remaining: u32,
        new_remaining: u32,
    },

    #[error("cannot strip {strip} leading components from path {path:?}")]
    StripExceedsPath { path: String, strip: usize },
}

impl DiffParseError {
    /// True for errors caused by `strip` rather than by the diff structure.
    pub fn is_path_error(&self) -> bool {
        matches!(self, DiffParseError::StripExceedsPath { .. })
    }
}
