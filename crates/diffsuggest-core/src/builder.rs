//! Diagnostic builder: one hunk in, one diagnostic per change block out.
//!
//! A change block is a maximal run of deletions and additions between two
//! context lines (or the hunk edges). Anchors are always reported in
//! new-file line numbers:
//!
//! | block       | location                                   | suggestion text |
//! |-------------|--------------------------------------------|-----------------|
//! | deletion    | point on the new line before the gap       | none            |
//! | insertion   | point `{line, column: 1}` at first new line | added lines     |
//! | replacement | the `D` replaced lines, starting at the block | added lines   |

use tracing::trace;

use diffsuggest_diff::{DiffFile, DiffLine, Hunk, LineKind};
use diffsuggest_types::{Diagnostic, Location, Position, Range, Suggestion};

use crate::ParseError;

/// Build the diagnostics of every hunk of `file`, in hunk order.
pub fn diagnostics_for_file(file: &DiffFile) -> Result<Vec<Diagnostic>, ParseError> {
    let mut out = Vec::new();
    for hunk in &file.hunks {
        out.extend(diagnostics_for_hunk(&file.path, hunk)?);
    }
    Ok(out)
}

/// Build the diagnostics of one hunk.
///
/// Cursors come only from the hunk's own header, so hunks can be built in
/// any order or in parallel.
pub fn diagnostics_for_hunk(path: &str, hunk: &Hunk) -> Result<Vec<Diagnostic>, ParseError> {
    let mut reducer = HunkReducer::new(path, hunk);
    let mut out = Vec::new();
    for line in &hunk.lines {
        if let Some(d) = reducer.step(line)? {
            out.push(d);
        }
    }
    out.extend(reducer.finish()?);
    Ok(out)
}

/// Explicit per-hunk state: the two cursors plus the pending change block.
#[derive(Debug)]
pub struct HunkReducer<'a> {
    path: &'a str,
    hunk: &'a Hunk,
    old_line: u32,
    new_line: u32,
    old_end: u32,
    new_end: u32,
    pending: ChangeBlock<'a>,
}

impl<'a> HunkReducer<'a> {
    pub fn new(path: &'a str, hunk: &'a Hunk) -> Self {
        let old_line = hunk.first_old_line();
        let new_line = hunk.first_new_line();
        Self {
            path,
            hunk,
            old_line,
            new_line,
            old_end: old_line.saturating_add(hunk.old_lines),
            new_end: new_line.saturating_add(hunk.new_lines),
            pending: ChangeBlock::default(),
        }
    }

    /// Next old-file line number to be consumed.
    pub fn old_line(&self) -> u32 {
        self.old_line
    }

    /// Next new-file line number to be consumed.
    pub fn new_line(&self) -> u32 {
        self.new_line
    }

    /// Feed one body line; returns the diagnostic of a block it closes.
    pub fn step(&mut self, line: &'a DiffLine) -> Result<Option<Diagnostic>, ParseError> {
        match line.kind {
            LineKind::Context => {
                self.check(self.old_line < self.old_end && self.new_line < self.new_end)?;
                let closed = self.close()?;
                self.old_line += 1;
                self.new_line += 1;
                Ok(closed)
            }
            LineKind::Deletion => {
                self.check(self.old_line < self.old_end)?;
                self.pending.deletions.push((self.old_line, line));
                self.old_line += 1;
                Ok(None)
            }
            LineKind::Addition => {
                self.check(self.new_line < self.new_end)?;
                self.pending.additions.push((self.new_line, line));
                self.new_line += 1;
                Ok(None)
            }
        }
    }

    /// Close the trailing block and verify both cursors landed on the header's totals.
    pub fn finish(mut self) -> Result<Option<Diagnostic>, ParseError> {
        self.check(self.old_line == self.old_end && self.new_line == self.new_end)?;
        self.close()
    }

    fn check(&self, ok: bool) -> Result<(), ParseError> {
        if ok {
            return Ok(());
        }
        Err(self.mismatch())
    }

    fn mismatch(&self) -> ParseError {
        ParseError::CursorMismatch {
            path: self.path.to_string(),
            old_start: self.hunk.old_start,
            old_lines: self.hunk.old_lines,
            new_start: self.hunk.new_start,
            new_lines: self.hunk.new_lines,
            old_line: self.old_line,
            new_line: self.new_line,
        }
    }

    fn close(&mut self) -> Result<Option<Diagnostic>, ParseError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        let block = std::mem::take(&mut self.pending);
        let d = block
            .into_diagnostic(self.path, self.new_line)
            .ok_or_else(|| self.mismatch())?;
        trace!(
            "Emitting diagnostic for {}:{}-{}",
            d.location.path,
            d.location.range.start.line,
            d.location.range.end.line
        );
        Ok(Some(d))
    }
}

/// Deletions then additions, each with its own side's line number.
#[derive(Debug, Default)]
struct ChangeBlock<'a> {
    deletions: Vec<(u32, &'a DiffLine)>,
    additions: Vec<(u32, &'a DiffLine)>,
}

impl ChangeBlock<'_> {
    fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.additions.is_empty()
    }

    /// `new_line` is the new-side cursor after the block's last line.
    /// `None` when the replaced range runs past `u32::MAX`.
    fn into_diagnostic(self, path: &str, new_line: u32) -> Option<Diagnostic> {
        let added = u32::try_from(self.additions.len()).ok()?;
        let deleted = u32::try_from(self.deletions.len()).ok()?;
        let block_start = new_line.checked_sub(added)?;

        let (range, text) = if added == 0 {
            // The removed run sits after the previous new-file line.
            let at = new_line.saturating_sub(1).max(1);
            (Range::lines(at, at), None)
        } else if deleted == 0 {
            let at = Position::with_column(block_start, 1);
            (Range::point(at), Some(self.insertion_text()))
        } else {
            let end = block_start.checked_add(deleted - 1)?;
            (Range::lines(block_start, end), Some(self.replacement_text()))
        };

        Some(Diagnostic {
            location: Location {
                path: path.to_string(),
                range,
            },
            suggestions: vec![Suggestion { range, text }],
            original_output: self.original_output(path),
        })
    }

    /// Inserted text lands before column 1, so every line keeps its newline
    /// unless the file ends without one.
    fn insertion_text(&self) -> String {
        let mut text = String::new();
        let last = self.additions.len().saturating_sub(1);
        for (i, (_, line)) in self.additions.iter().enumerate() {
            text.push_str(&line.text);
            if !(i == last && line.no_newline_at_eof) {
                text.push('\n');
            }
        }
        text
    }

    /// The range covers whole lines, so only a newline the old side lacked
    /// and the new side has needs adding.
    fn replacement_text(&self) -> String {
        let mut text = self
            .additions
            .iter()
            .map(|(_, l)| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let old_missing = self.deletions.last().is_some_and(|(_, l)| l.no_newline_at_eof);
        let new_missing = self.additions.last().is_some_and(|(_, l)| l.no_newline_at_eof);
        if old_missing && !new_missing {
            text.push('\n');
        }
        text
    }

    fn original_output(&self, path: &str) -> String {
        let deleted = self
            .deletions
            .iter()
            .map(|(n, l)| format!("{path}:{n}:-{}", l.text));
        let added = self
            .additions
            .iter()
            .map(|(n, l)| format!("{path}:{n}:+{}", l.text));
        deleted.chain(added).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunk(old: (u32, u32), new: (u32, u32), lines: Vec<DiffLine>) -> Hunk {
        Hunk {
            old_start: old.0,
            old_lines: old.1,
            new_start: new.0,
            new_lines: new.1,
            heading: None,
            lines,
        }
    }

    fn build(h: &Hunk) -> Vec<Diagnostic> {
        diagnostics_for_hunk("f.go", h).unwrap()
    }

    #[test]
    fn context_only_hunk_is_silent() {
        let h = hunk(
            (1, 2),
            (1, 2),
            vec![DiffLine::context("a"), DiffLine::context("b")],
        );
        assert!(build(&h).is_empty());
    }

    #[test]
    fn single_line_replacement() {
        let h = hunk(
            (1, 3),
            (1, 3),
            vec![
                DiffLine::context("package testdata"),
                DiffLine::context(""),
                DiffLine::deletion("func    fmt     () {"),
                DiffLine::addition("func fmt() {"),
            ],
        );
        let ds = build(&h);
        assert_eq!(ds.len(), 1);
        let d = &ds[0];
        assert_eq!(d.location.path, "f.go");
        assert_eq!(d.location.range, Range::lines(3, 3));
        assert_eq!(d.suggestions[0].range, Range::lines(3, 3));
        assert_eq!(d.suggestions[0].text.as_deref(), Some("func fmt() {"));
        assert_eq!(
            d.original_output,
            "f.go:3:-func    fmt     () {\nf.go:3:+func fmt() {"
        );
    }

    #[test]
    fn pure_insertion_is_column_one_point() {
        let h = hunk(
            (4, 2),
            (4, 4),
            vec![
                DiffLine::context("a"),
                DiffLine::addition("x"),
                DiffLine::addition("y"),
                DiffLine::context("b"),
            ],
        );
        let ds = build(&h);
        assert_eq!(ds.len(), 1);
        let at = Position::with_column(5, 1);
        assert_eq!(ds[0].location.range, Range::point(at));
        assert_eq!(ds[0].suggestions[0].text.as_deref(), Some("x\ny\n"));
        assert_eq!(ds[0].original_output, "f.go:5:+x\nf.go:6:+y");
    }

    #[test]
    fn insertion_at_hunk_tail_keeps_newline() {
        let h = hunk(
            (1, 1),
            (1, 2),
            vec![DiffLine::context("a"), DiffLine::addition("tail")],
        );
        let ds = build(&h);
        assert_eq!(ds[0].location.range, Range::point(Position::with_column(2, 1)));
        assert_eq!(ds[0].suggestions[0].text.as_deref(), Some("tail\n"));
    }

    #[test]
    fn insertion_without_final_newline() {
        let h = hunk(
            (1, 1),
            (1, 2),
            vec![
                DiffLine::context("a"),
                DiffLine::addition("tail").without_newline(),
            ],
        );
        assert_eq!(build(&h)[0].suggestions[0].text.as_deref(), Some("tail"));
    }

    #[test]
    fn pure_deletion_has_no_text() {
        let h = hunk(
            (1, 3),
            (1, 2),
            vec![
                DiffLine::context("a"),
                DiffLine::deletion("gone"),
                DiffLine::context("c"),
            ],
        );
        let ds = build(&h);
        assert_eq!(ds.len(), 1);
        assert!(ds[0].location.range.is_point());
        assert_eq!(ds[0].location.range, Range::lines(1, 1));
        assert!(ds[0].suggestions[0].is_deletion());
        assert_eq!(ds[0].original_output, "f.go:2:-gone");
    }

    #[test]
    fn deletion_at_top_of_file_clamps_to_line_one() {
        let h = hunk(
            (1, 2),
            (1, 1),
            vec![DiffLine::deletion("first"), DiffLine::context("second")],
        );
        assert_eq!(build(&h)[0].location.range, Range::lines(1, 1));
    }

    #[test]
    fn whole_file_deletion() {
        let h = hunk(
            (1, 2),
            (0, 0),
            vec![DiffLine::deletion("a"), DiffLine::deletion("b")],
        );
        let ds = build(&h);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].location.range, Range::lines(1, 1));
        assert_eq!(ds[0].original_output, "f.go:1:-a\nf.go:2:-b");
    }

    #[test]
    fn zero_context_deletion_anchors_after_named_line() {
        // `git diff -U0`: old lines 5-6 removed, new side empty after line 4.
        let h = hunk(
            (5, 2),
            (4, 0),
            vec![DiffLine::deletion("x"), DiffLine::deletion("y")],
        );
        assert_eq!(build(&h)[0].location.range, Range::lines(4, 4));
    }

    #[test]
    fn replacement_spans_deleted_count_in_new_numbering() {
        // The insertion earlier in the hunk shifts new numbering by one.
        let h = hunk(
            (1, 4),
            (1, 4),
            vec![
                DiffLine::addition("inserted"),
                DiffLine::context("a"),
                DiffLine::deletion("b"),
                DiffLine::deletion("c"),
                DiffLine::addition("B"),
                DiffLine::context("d"),
            ],
        );
        let ds = build(&h);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[1].location.range, Range::lines(3, 4));
        assert_eq!(ds[1].suggestions[0].text.as_deref(), Some("B"));
        assert_eq!(ds[1].original_output, "f.go:2:-b\nf.go:3:-c\nf.go:3:+B");
    }

    #[test]
    fn newline_matrix_for_replacement() {
        let cases = [
            (false, false, "b"),
            (true, false, "b\n"),
            (false, true, "b"),
            (true, true, "b"),
        ];
        for (old_flag, new_flag, want) in cases {
            let mut del = DiffLine::deletion("a");
            del.no_newline_at_eof = old_flag;
            let mut add = DiffLine::addition("b");
            add.no_newline_at_eof = new_flag;
            let h = hunk((1, 2), (1, 2), vec![DiffLine::context("x"), del, add]);
            let ds = build(&h);
            assert_eq!(
                ds[0].suggestions[0].text.as_deref(),
                Some(want),
                "old flag {old_flag}, new flag {new_flag}"
            );
        }
    }

    #[test]
    fn body_longer_than_header_fails_fast() {
        let h = hunk(
            (1, 1),
            (1, 1),
            vec![DiffLine::context("a"), DiffLine::addition("extra")],
        );
        let err = diagnostics_for_hunk("f.go", &h).unwrap_err();
        assert!(matches!(err, ParseError::CursorMismatch { new_line: 2, .. }));
    }

    #[test]
    fn replacement_near_u32_max() {
        let h = hunk(
            (1, 2),
            (4_294_967_294, 1),
            vec![DiffLine::deletion("a"), DiffLine::deletion("b"), DiffLine::addition("c")],
        );
        let ds = build(&h);
        assert_eq!(ds[0].location.range, Range::lines(4_294_967_294, 4_294_967_295));
    }

    #[test]
    fn replacement_past_u32_max_is_a_mismatch() {
        let h = hunk(
            (1, 3),
            (4_294_967_294, 1),
            vec![
                DiffLine::deletion("a"),
                DiffLine::deletion("b"),
                DiffLine::deletion("c"),
                DiffLine::addition("d"),
            ],
        );
        let err = diagnostics_for_hunk("f.go", &h).unwrap_err();
        assert!(matches!(
            err,
            ParseError::CursorMismatch { new_start: 4_294_967_294, new_line: 4_294_967_295, .. }
        ));
    }

    #[test]
    fn body_shorter_than_header_fails_at_finish() {
        let h = hunk((1, 3), (1, 3), vec![DiffLine::deletion("a")]);
        let err = diagnostics_for_hunk("f.go", &h).unwrap_err();
        assert!(matches!(err, ParseError::CursorMismatch { .. }));
    }

    #[test]
    fn reducer_cursors_advance_per_kind() {
        let h = hunk(
            (10, 2),
            (20, 2),
            vec![
                DiffLine::context("a"),
                DiffLine::deletion("b"),
                DiffLine::addition("c"),
            ],
        );
        let mut r = HunkReducer::new("f.go", &h);
        assert_eq!((r.old_line(), r.new_line()), (10, 20));
        r.step(&h.lines[0]).unwrap();
        assert_eq!((r.old_line(), r.new_line()), (11, 21));
        r.step(&h.lines[1]).unwrap();
        assert_eq!((r.old_line(), r.new_line()), (12, 21));
        r.step(&h.lines[2]).unwrap();
        assert_eq!((r.old_line(), r.new_line()), (12, 22));
        let d = r.finish().unwrap().unwrap();
        assert_eq!(d.location.range, Range::lines(21, 21));
    }
}
