use diffsuggest_diff::DiffParseError;

/// Broad classes of parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed headers, inconsistent counts, truncated input.
    Structural,
    /// `strip` exceeds a path's component count.
    Path,
    Cancelled,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Diff(#[from] DiffParseError),

    #[error(
        "{path}: hunk -{old_start},{old_lines} +{new_start},{new_lines} \
         does not match its body (old cursor {old_line}, new cursor {new_line})"
    )]
    CursorMismatch {
        path: String,
        old_start: u32,
        old_lines: u32,
        new_start: u32,
        new_lines: u32,
        old_line: u32,
        new_line: u32,
    },

    #[error("parse cancelled after {files_done} file section(s)")]
    Cancelled { files_done: usize },

    #[error("read diff input")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Diff(e) if e.is_path_error() => ErrorKind::Path,
            ParseError::Diff(_) | ParseError::CursorMismatch { .. } => ErrorKind::Structural,
            ParseError::Cancelled { .. } => ErrorKind::Cancelled,
            ParseError::Io(_) => ErrorKind::Io,
        }
    }
}
