//! Unified diff builders for constructing test diffs.
//!
//! This module provides a fluent API for building valid unified diff strings.
//! Hunk headers can be given explicitly or derived from the body, and any
//! body line can be followed by a `\ No newline at end of file` notice.
//!
//! # Bounds
//!
//! To keep tests fast, the following bounds are enforced:
//! - Max files per diff: 5
//! - Max hunks per file: 5
//! - Max lines per hunk: 20
//! - Max line length: 200 bytes
//!
//! # Example
//!
//! ```rust
//! use diffsuggest_testkit::diff_builder::DiffBuilder;
//!
//! let diff = DiffBuilder::new()
//!     .file("src/lib.rs")
//!         .hunk_at(1, 1)
//!             .context("fn existing() {}")
//!             .add_line("fn new_function() {}")
//!             .done()
//!         .done()
//!     .build();
//!
//! assert!(diff.contains("@@ -1,1 +1,2 @@"));
//! assert!(diff.contains("+fn new_function() {}"));
//! ```

use crate::arb::{MAX_FILES, MAX_HUNKS_PER_FILE, MAX_LINES_PER_HUNK, MAX_LINE_LENGTH};

const NO_NEWLINE: &str = "\\ No newline at end of file";

/// A builder for constructing unified diff strings.
#[derive(Debug, Clone, Default)]
pub struct DiffBuilder {
    files: Vec<FileBuilder>,
}

impl DiffBuilder {
    /// Create a new empty diff builder.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a file to the diff and return a file builder.
    ///
    /// # Panics
    ///
    /// Panics if MAX_FILES would be exceeded.
    pub fn file(self, path: &str) -> FileBuilderInProgress {
        assert!(
            self.files.len() < MAX_FILES,
            "Cannot add more than {} files to a diff",
            MAX_FILES
        );
        FileBuilderInProgress {
            diff_builder: self,
            file_builder: FileBuilder::new(path),
        }
    }

    /// Add a pre-built file to the diff.
    pub fn add_file(mut self, file: FileBuilder) -> Self {
        assert!(
            self.files.len() < MAX_FILES,
            "Cannot add more than {} files to a diff",
            MAX_FILES
        );
        self.files.push(file);
        self
    }

    /// Build the complete diff string, newline-terminated.
    pub fn build(self) -> String {
        self.files.iter().map(|f| f.build()).collect()
    }
}

/// Helper struct for building a file within a diff.
#[derive(Debug)]
pub struct FileBuilderInProgress {
    diff_builder: DiffBuilder,
    file_builder: FileBuilder,
}

impl FileBuilderInProgress {
    /// Add a hunk with an explicit header.
    pub fn hunk(
        self,
        old_start: u32,
        old_count: u32,
        new_start: u32,
        new_count: u32,
    ) -> HunkBuilderInProgress {
        HunkBuilderInProgress {
            file_in_progress: self,
            hunk_builder: HunkBuilder::new(old_start, old_count, new_start, new_count),
        }
    }

    /// Add a hunk whose counts are derived from its body.
    pub fn hunk_at(self, old_start: u32, new_start: u32) -> HunkBuilderInProgress {
        HunkBuilderInProgress {
            file_in_progress: self,
            hunk_builder: HunkBuilder::at(old_start, new_start),
        }
    }

    /// Mark as a deleted file.
    pub fn deleted(mut self) -> Self {
        self.file_builder = self.file_builder.deleted();
        self
    }

    /// Mark as a new file.
    pub fn new_file(mut self) -> Self {
        self.file_builder = self.file_builder.new_file();
        self
    }

    /// Mark as a rename.
    pub fn rename_from(mut self, old_path: &str) -> Self {
        self.file_builder = self.file_builder.rename_from(old_path);
        self
    }

    /// Append a tab-separated timestamp to the `---`/`+++` headers.
    pub fn timestamp(mut self, stamp: &str) -> Self {
        self.file_builder = self.file_builder.timestamp(stamp);
        self
    }

    /// Omit the `diff --git` line, like plain `diff -u` output.
    pub fn without_git_header(mut self) -> Self {
        self.file_builder = self.file_builder.without_git_header();
        self
    }

    /// Finish this file and return to the diff builder.
    pub fn done(mut self) -> DiffBuilder {
        self.diff_builder.files.push(self.file_builder);
        self.diff_builder
    }
}

/// Helper struct for building a hunk within a file.
#[derive(Debug)]
pub struct HunkBuilderInProgress {
    file_in_progress: FileBuilderInProgress,
    hunk_builder: HunkBuilder,
}

impl HunkBuilderInProgress {
    /// Add a context line (unchanged).
    pub fn context(mut self, content: &str) -> Self {
        self.hunk_builder = self.hunk_builder.context(content);
        self
    }

    /// Add an added line.
    pub fn add_line(mut self, content: &str) -> Self {
        self.hunk_builder = self.hunk_builder.add_line(content);
        self
    }

    /// Add a removed line.
    pub fn remove(mut self, content: &str) -> Self {
        self.hunk_builder = self.hunk_builder.remove(content);
        self
    }

    /// Follow the previous line with a no-newline notice.
    pub fn no_newline(mut self) -> Self {
        self.hunk_builder = self.hunk_builder.no_newline();
        self
    }

    /// Finish this hunk and return to the file builder.
    pub fn done(mut self) -> FileBuilderInProgress {
        self.file_in_progress.file_builder = self
            .file_in_progress
            .file_builder
            .add_hunk(self.hunk_builder);
        self.file_in_progress
    }
}

/// A builder for a single file in a diff.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    path: String,
    old_path: Option<String>,
    hunks: Vec<HunkBuilder>,
    is_deleted: bool,
    is_new_file: bool,
    timestamp: Option<String>,
    git_header: bool,
}

impl FileBuilder {
    /// Create a new file builder with the given (unprefixed) path.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            old_path: None,
            hunks: Vec::new(),
            is_deleted: false,
            is_new_file: false,
            timestamp: None,
            git_header: true,
        }
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn new_file(mut self) -> Self {
        self.is_new_file = true;
        self
    }

    pub fn rename_from(mut self, old_path: &str) -> Self {
        self.old_path = Some(old_path.to_string());
        self
    }

    pub fn timestamp(mut self, stamp: &str) -> Self {
        self.timestamp = Some(stamp.to_string());
        self
    }

    pub fn without_git_header(mut self) -> Self {
        self.git_header = false;
        self
    }

    /// Add a hunk to this file.
    ///
    /// # Panics
    ///
    /// Panics if MAX_HUNKS_PER_FILE would be exceeded.
    pub fn add_hunk(mut self, hunk: HunkBuilder) -> Self {
        assert!(
            self.hunks.len() < MAX_HUNKS_PER_FILE,
            "Cannot add more than {} hunks to a file",
            MAX_HUNKS_PER_FILE
        );
        self.hunks.push(hunk);
        self
    }

    /// Build the diff output for this file, newline-terminated.
    pub fn build(&self) -> String {
        let mut lines = Vec::new();

        let a_path = self.old_path.as_deref().unwrap_or(&self.path);
        let b_path = &self.path;
        let stamp = self
            .timestamp
            .as_deref()
            .map(|s| format!("\t{s}"))
            .unwrap_or_default();

        if self.git_header {
            lines.push(format!("diff --git a/{} b/{}", a_path, b_path));
            if self.is_deleted {
                lines.push("deleted file mode 100644".to_string());
                lines.push("index 1111111..0000000".to_string());
            } else {
                if self.is_new_file {
                    lines.push("new file mode 100644".to_string());
                }
                if self.old_path.is_some() {
                    lines.push("similarity index 90%".to_string());
                    lines.push(format!("rename from {}", a_path));
                    lines.push(format!("rename to {}", b_path));
                }
                lines.push("index 0000000..1111111 100644".to_string());
            }
        }

        if self.is_new_file {
            lines.push("--- /dev/null".to_string());
        } else {
            lines.push(format!("--- a/{}{}", a_path, stamp));
        }
        if self.is_deleted {
            lines.push("+++ /dev/null".to_string());
        } else {
            lines.push(format!("+++ b/{}{}", b_path, stamp));
        }

        for hunk in &self.hunks {
            lines.extend(hunk.build_lines());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// One body line of a [`HunkBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkLine {
    Context(String),
    Add(String),
    Remove(String),
    NoNewline,
}

/// A builder for a hunk within a file diff.
#[derive(Debug, Clone)]
pub struct HunkBuilder {
    old_start: u32,
    new_start: u32,
    counts: Option<(u32, u32)>,
    lines: Vec<HunkLine>,
}

impl HunkBuilder {
    /// Create a hunk builder with an explicit header.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            new_start,
            counts: Some((old_count, new_count)),
            lines: Vec::new(),
        }
    }

    /// Create a hunk builder whose counts are computed from the body.
    pub fn at(old_start: u32, new_start: u32) -> Self {
        Self {
            old_start,
            new_start,
            counts: None,
            lines: Vec::new(),
        }
    }

    /// Create a hunk builder from a prepared body.
    pub fn from_lines(old_start: u32, new_start: u32, lines: Vec<HunkLine>) -> Self {
        let mut builder = Self::at(old_start, new_start);
        for line in lines {
            builder = builder.push(line);
        }
        builder
    }

    /// Add a context line.
    ///
    /// # Panics
    ///
    /// Panics if MAX_LINES_PER_HUNK would be exceeded.
    pub fn context(self, content: &str) -> Self {
        self.push(HunkLine::Context(content.to_string()))
    }

    /// Add an added line.
    pub fn add_line(self, content: &str) -> Self {
        self.push(HunkLine::Add(content.to_string()))
    }

    /// Add a removed line.
    pub fn remove(self, content: &str) -> Self {
        self.push(HunkLine::Remove(content.to_string()))
    }

    /// Follow the previous line with `\ No newline at end of file`.
    pub fn no_newline(self) -> Self {
        self.push(HunkLine::NoNewline)
    }

    /// Add multiple added lines.
    pub fn add_lines(mut self, lines: &[&str]) -> Self {
        for line in lines {
            self = self.add_line(line);
        }
        self
    }

    /// Add multiple removed lines.
    pub fn remove_lines(mut self, lines: &[&str]) -> Self {
        for line in lines {
            self = self.remove(line);
        }
        self
    }

    fn push(mut self, line: HunkLine) -> Self {
        if let HunkLine::Context(c) | HunkLine::Add(c) | HunkLine::Remove(c) = &line {
            assert!(
                self.lines.len() < MAX_LINES_PER_HUNK,
                "Cannot add more than {} lines to a hunk",
                MAX_LINES_PER_HUNK
            );
            assert!(
                c.len() <= MAX_LINE_LENGTH,
                "Line content cannot exceed {} bytes",
                MAX_LINE_LENGTH
            );
        }
        self.lines.push(line);
        self
    }

    /// Old and new line counts of the body.
    pub fn body_counts(&self) -> (u32, u32) {
        let mut old = 0;
        let mut new = 0;
        for line in &self.lines {
            match line {
                HunkLine::Context(_) => {
                    old += 1;
                    new += 1;
                }
                HunkLine::Remove(_) => old += 1,
                HunkLine::Add(_) => new += 1,
                HunkLine::NoNewline => {}
            }
        }
        (old, new)
    }

    /// The header line, e.g. `@@ -1,3 +1,4 @@`.
    pub fn header(&self) -> String {
        let (old_count, new_count) = self.counts.unwrap_or_else(|| self.body_counts());
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, old_count, self.new_start, new_count
        )
    }

    /// Build the hunk output (no trailing newline).
    pub fn build(&self) -> String {
        self.build_lines().join("\n")
    }

    fn build_lines(&self) -> Vec<String> {
        let mut out = vec![self.header()];
        for line in &self.lines {
            out.push(match line {
                HunkLine::Context(c) => format!(" {c}"),
                HunkLine::Add(c) => format!("+{c}"),
                HunkLine::Remove(c) => format!("-{c}"),
                HunkLine::NoNewline => NO_NEWLINE.to_string(),
            });
        }
        out
    }
}
