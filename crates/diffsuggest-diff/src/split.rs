use tracing::{debug, trace};

use crate::hunk::scan_hunks;
use crate::path::{git_header_paths, header_path, strip_path};
use crate::reader::{trim_cr, LineReader};
use crate::{DiffFile, DiffParseError, FileStatus, DEV_NULL};

/// Parse every file section of `diff_text`, in input order.
pub fn split_files(diff_text: &str, strip: usize) -> Result<Vec<DiffFile>, DiffParseError> {
    FileSections::new(diff_text, strip).collect()
}

/// Lazily yields one [`DiffFile`] per file section.
///
/// Iteration stops after the first error.
pub struct FileSections<'a> {
    lines: LineReader<'a>,
    strip: usize,
    done: bool,
}

impl<'a> FileSections<'a> {
    pub fn new(diff_text: &'a str, strip: usize) -> Self {
        Self {
            lines: LineReader::new(diff_text),
            strip,
            done: false,
        }
    }

    fn next_file(&mut self) -> Result<Option<DiffFile>, DiffParseError> {
        // Paths from `diff --git a/P b/P`, used when a side is /dev/null.
        let mut git_paths: Option<(String, String)> = None;

        while let Some(raw) = self.lines.next_line() {
            let line = trim_cr(raw);

            if let Some(rest) = line.strip_prefix("diff --git ") {
                git_paths = git_header_paths(rest);
                trace!("File section header at line {}", self.lines.line_no());
                continue;
            }

            if line.starts_with("@@") {
                return Err(DiffParseError::HunkBeforeFileHeader {
                    line: self.lines.line_no(),
                });
            }

            if let Some(old_rest) = line.strip_prefix("--- ") {
                let file = self.read_section(old_rest, git_paths.take())?;
                return Ok(Some(file));
            }

            // Preamble, extended git headers, binary notices, signatures.
            trace!("Skipping line {}: {:?}", self.lines.line_no(), line);
        }

        Ok(None)
    }

    fn read_section(
        &mut self,
        old_rest: &str,
        git_paths: Option<(String, String)>,
    ) -> Result<DiffFile, DiffParseError> {
        let old_line = self.lines.line_no();
        let old_raw = header_path(old_rest).ok_or_else(|| DiffParseError::MalformedFileHeader {
            line: old_line,
            header: format!("--- {old_rest}"),
        })?;

        let new_rest = self
            .lines
            .peek()
            .map(trim_cr)
            .and_then(|l| l.strip_prefix("+++ "))
            .ok_or(DiffParseError::MissingNewFileHeader { line: old_line })?;
        self.lines.next_line();
        let new_raw = header_path(new_rest).ok_or_else(|| DiffParseError::MalformedFileHeader {
            line: self.lines.line_no(),
            header: format!("+++ {new_rest}"),
        })?;

        let (status, raw_path) = if new_raw == DEV_NULL {
            let from_git = git_paths.map(|(_, b)| b);
            (FileStatus::Deleted, from_git.unwrap_or_else(|| old_raw.clone()))
        } else if old_raw == DEV_NULL {
            (FileStatus::Added, new_raw.clone())
        } else {
            (FileStatus::Modified, new_raw.clone())
        };

        let path = strip_path(&raw_path, self.strip)?;
        // Only the new-side path is required to survive the strip.
        let old_path = if old_raw == DEV_NULL {
            None
        } else {
            strip_path(&old_raw, self.strip).ok()
        };

        let status = match (&status, &old_path) {
            (FileStatus::Modified, Some(old)) if *old != path => FileStatus::Renamed,
            _ => status,
        };

        let hunks = scan_hunks(&mut self.lines)?;
        debug!(
            "Parsed file section '{}' ({:?}, {} hunks) at line {}",
            path,
            status,
            hunks.len(),
            old_line
        );

        Ok(DiffFile {
            path,
            old_path,
            status,
            hunks,
        })
    }
}

impl Iterator for FileSections<'_> {
    type Item = Result<DiffFile, DiffParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_file() {
            Ok(Some(file)) => Some(Ok(file)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineKind;

    #[test]
    fn parses_git_diff_with_preamble() {
        let diff = r#"

diff --git a/src/lib.rs b/src/lib.rs
index 0000000..1111111 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,1 +1,2 @@
 fn a() {}
+fn b() { let _ = 1; }
"#;

        let files = split_files(diff, 1).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/lib.rs");
        assert_eq!(files[0].old_path.as_deref(), Some("src/lib.rs"));
        assert_eq!(files[0].status, FileStatus::Modified);
        assert_eq!(files[0].hunks.len(), 1);
        assert_eq!(files[0].hunks[0].lines[1].kind, LineKind::Addition);
    }

    #[test]
    fn strip_zero_keeps_prefixes() {
        let diff = "--- a/x.txt\n+++ b/x.txt\n@@ -1 +1 @@\n-a\n+b\n";
        let files = split_files(diff, 0).unwrap();
        assert_eq!(files[0].path, "b/x.txt");
        assert_eq!(files[0].old_path.as_deref(), Some("a/x.txt"));
    }

    #[test]
    fn timestamps_are_dropped() {
        let diff = "--- a/gofmt.go\t2020-07-26 08:01:09.260800318 +0000\n\
                    +++ b/gofmt.go\t2020-07-26 08:01:09.260800318 +0000\n\
                    @@ -1 +1 @@\n-a\n+b\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files[0].path, "gofmt.go");
    }

    #[test]
    fn deleted_file_takes_git_header_path() {
        let diff = "diff --git a/gone.rs b/gone.rs\n\
                    deleted file mode 100644\n\
                    index 1111111..0000000\n\
                    --- a/gone.rs\n\
                    +++ /dev/null\n\
                    @@ -1,1 +0,0 @@\n\
                    -fn deleted() {}\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files[0].path, "gone.rs");
        assert_eq!(files[0].status, FileStatus::Deleted);
    }

    #[test]
    fn deleted_file_without_git_header_uses_old_path() {
        let diff = "--- a/gone.rs\n+++ /dev/null\n@@ -1 +0,0 @@\n-x\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files[0].path, "gone.rs");
    }

    #[test]
    fn new_file_has_no_old_path() {
        let diff = "diff --git a/new.rs b/new.rs\n\
                    new file mode 100644\n\
                    --- /dev/null\n\
                    +++ b/new.rs\n\
                    @@ -0,0 +1 @@\n\
                    +fn new() {}\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files[0].path, "new.rs");
        assert_eq!(files[0].old_path, None);
        assert_eq!(files[0].status, FileStatus::Added);
    }

    #[test]
    fn rename_is_detected() {
        let diff = "diff --git a/old.rs b/new.rs\n\
                    similarity index 90%\n\
                    rename from old.rs\n\
                    rename to new.rs\n\
                    --- a/old.rs\n\
                    +++ b/new.rs\n\
                    @@ -1 +1 @@\n-a\n+b\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files[0].status, FileStatus::Renamed);
        assert_eq!(files[0].old_path.as_deref(), Some("old.rs"));
    }

    #[test]
    fn unstrippable_old_path_is_not_a_rename() {
        let diff = "--- a/x.rs\n+++ b/src/x.rs\n@@ -1 +1 @@\n-a\n+b\n";
        let files = split_files(diff, 2).unwrap();
        assert_eq!(files[0].path, "x.rs");
        assert_eq!(files[0].old_path, None);
        assert_eq!(files[0].status, FileStatus::Modified);
    }

    #[test]
    fn binary_and_mode_only_sections_are_skipped() {
        let diff = "diff --git a/img.png b/img.png\n\
                    index 0000000..1111111 100644\n\
                    Binary files a/img.png and b/img.png differ\n\
                    diff --git a/run.sh b/run.sh\n\
                    old mode 100644\n\
                    new mode 100755\n\
                    diff --git a/src/a.rs b/src/a.rs\n\
                    --- a/src/a.rs\n\
                    +++ b/src/a.rs\n\
                    @@ -1 +1 @@\n-a\n+b\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/a.rs");
    }

    #[test]
    fn multiple_files_keep_input_order() {
        let diff = "--- a/one\n+++ b/one\n@@ -1 +1 @@\n-a\n+b\n\
                    --- a/two\n+++ b/two\n@@ -1 +1 @@\n-a\n+b\n";
        let paths: Vec<String> = split_files(diff, 1)
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(paths, vec!["one", "two"]);
    }

    #[test]
    fn deletion_of_dashed_line_is_not_a_file_header() {
        let diff = "--- a/x\n+++ b/x\n@@ -1,2 +1,1 @@\n--- not a header\n keep\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].hunks[0].lines[0].text, "-- not a header");
    }

    #[test]
    fn format_patch_signature_ends_section() {
        let diff = "--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n-- \n2.43.0\n\n";
        assert_eq!(split_files(diff, 1).unwrap().len(), 1);
    }

    #[test]
    fn hunk_before_file_header_is_error() {
        let err = split_files("@@ -1 +1 @@\n-a\n+b\n", 1).unwrap_err();
        assert_eq!(err, DiffParseError::HunkBeforeFileHeader { line: 1 });
    }

    #[test]
    fn old_header_without_new_header_is_error() {
        let err = split_files("--- a/x\n@@ -1 +1 @@\n", 1).unwrap_err();
        assert_eq!(err, DiffParseError::MissingNewFileHeader { line: 1 });
    }

    #[test]
    fn strip_exceeding_path_is_error() {
        let err = split_files("--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n", 2).unwrap_err();
        assert!(err.is_path_error());
    }

    #[test]
    fn empty_input_has_no_files() {
        assert!(split_files("", 1).unwrap().is_empty());
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut it = FileSections::new("@@ -1 +1 @@\n--- a/x\n+++ b/x\n", 1);
        assert!(matches!(it.next(), Some(Err(_))));
        assert!(it.next().is_none());
    }

    #[test]
    fn crlf_headers_are_recognized() {
        let diff = "--- a/x\r\n+++ b/x\r\n@@ -1 +1 @@\r\n-a\r\n+b\r\n";
        let files = split_files(diff, 1).unwrap();
        assert_eq!(files[0].path, "x");
        assert_eq!(files[0].hunks[0].lines[1].text, "b\r");
    }
}
