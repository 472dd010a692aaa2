use std::io::Read;

use tracing::{debug, warn};

use diffsuggest_diff::{split_files, DiffFile, FileSections};
use diffsuggest_types::Diagnostic;

use crate::{diagnostics_for_file, CancelToken, ParseError};

/// Parses unified-diff text into diagnostics.
///
/// `strip` removes that many leading path components, like `patch -pN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffParser {
    strip: usize,
}

impl DiffParser {
    pub fn new(strip: usize) -> Self {
        Self { strip }
    }

    pub fn strip(&self) -> usize {
        self.strip
    }

    /// Parse `diff_text` into diagnostics in file, hunk, block order.
    ///
    /// Any error aborts the whole call; no partial list is returned.
    pub fn parse(&self, diff_text: &str) -> Result<Vec<Diagnostic>, ParseError> {
        self.run(diff_text, None, |_| {})
    }

    /// Like [`DiffParser::parse`], checking `cancel` before each file section.
    pub fn parse_with_cancel(
        &self,
        diff_text: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Diagnostic>, ParseError> {
        self.run(diff_text, Some(cancel), |_| {})
    }

    /// Buffer `reader` fully and parse it. Invalid UTF-8 is replaced, not rejected.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Vec<Diagnostic>, ParseError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes);
        if matches!(text, std::borrow::Cow::Owned(_)) {
            warn!("Diff input is not valid UTF-8; invalid bytes were replaced");
        }
        self.parse(&text)
    }

    /// Split into file sections without building diagnostics, for callers
    /// that want to fan files out or isolate a malformed one.
    pub fn split_files(&self, diff_text: &str) -> Result<Vec<DiffFile>, ParseError> {
        Ok(split_files(diff_text, self.strip)?)
    }

    /// `after_file` sees each section once its diagnostics are collected.
    fn run(
        &self,
        diff_text: &str,
        cancel: Option<&CancelToken>,
        mut after_file: impl FnMut(&DiffFile),
    ) -> Result<Vec<Diagnostic>, ParseError> {
        let mut out = Vec::new();
        let mut files_done = 0usize;
        let mut sections = FileSections::new(diff_text, self.strip);

        loop {
            // Checked before the next section is scanned.
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(ParseError::Cancelled { files_done });
            }
            let Some(file) = sections.next() else {
                break;
            };
            let file = file?;
            out.extend(diagnostics_for_file(&file)?);
            files_done += 1;
            after_file(&file);
        }

        debug!(
            "Parsed {} file section(s) into {} diagnostic(s) (strip={})",
            files_done,
            out.len(),
            self.strip
        );
        Ok(out)
    }
}
