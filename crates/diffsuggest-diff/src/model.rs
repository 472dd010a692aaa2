#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
}

impl LineKind {
    /// The unified-diff marker character for this kind.
    pub fn marker(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
        }
    }
}

/// One body line of a hunk, marker stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
    /// Set when the line is directly followed by `\ No newline at end of file`.
    pub no_newline_at_eof: bool,
}

impl DiffLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            no_newline_at_eof: false,
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::new(LineKind::Context, text)
    }

    pub fn addition(text: impl Into<String>) -> Self {
        Self::new(LineKind::Addition, text)
    }

    pub fn deletion(text: impl Into<String>) -> Self {
        Self::new(LineKind::Deletion, text)
    }

    pub fn without_newline(mut self) -> Self {
        self.no_newline_at_eof = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// Text after the closing `@@`, usually the enclosing function.
    pub heading: Option<String>,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// First old-file line number covered by the body.
    ///
    /// A zero-length side names the line *before* the empty range, so its
    /// first line is one further down.
    pub fn first_old_line(&self) -> u32 {
        first_line(self.old_start, self.old_lines)
    }

    /// First new-file line number covered by the body.
    pub fn first_new_line(&self) -> u32 {
        first_line(self.new_start, self.new_lines)
    }

    /// True when the body holds no additions or deletions.
    pub fn is_context_only(&self) -> bool {
        self.lines.iter().all(|l| l.kind == LineKind::Context)
    }
}

fn first_line(start: u32, count: u32) -> u32 {
    if count == 0 {
        start.saturating_add(1)
    } else {
        start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
}

/// One file section of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffFile {
    /// Path after strip, taken from the new side (or the old side for deletions).
    pub path: String,
    /// Old-side path after strip; `None` when the old side is `/dev/null` or
    /// has too few components to strip.
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub hunks: Vec<Hunk>,
}
