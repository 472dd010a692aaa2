use std::iter::Peekable;
use std::str::SplitInclusive;

/// Forward-only line reader with one line of lookahead.
///
/// Only the `\n` terminator is removed; a `\r` before it belongs to the line.
pub(crate) struct LineReader<'a> {
    lines: Peekable<SplitInclusive<'a, char>>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.split_inclusive('\n').peekable(),
            line_no: 0,
        }
    }

    pub(crate) fn peek(&mut self) -> Option<&'a str> {
        self.lines.peek().map(|l| strip_eol(l))
    }

    pub(crate) fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some(strip_eol(line))
    }

    /// 1-based number of the last line returned by `next_line` (0 before any).
    pub(crate) fn line_no(&self) -> usize {
        self.line_no
    }
}

fn strip_eol(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// Header lines are matched without a trailing `\r`.
pub(crate) fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
