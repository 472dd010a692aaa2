use tracing::debug;

use crate::reader::{trim_cr, LineReader};
use crate::{DiffLine, DiffParseError, Hunk, LineKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub heading: Option<String>,
}

/// Parse `@@ -old_start[,old_lines] +new_start[,new_lines] @@[ heading]`.
///
/// Omitted counts default to 1.
pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    // Formats:
    // @@ -1,2 +3,4 @@
    // @@ -1 +3 @@ fn main() {
    let rest = trim_cr(line).strip_prefix("@@ ")?;
    let (ranges, tail) = match rest.find(" @@") {
        Some(idx) => (&rest[..idx], &rest[idx + 3..]),
        None => return None,
    };

    let mut it = ranges.split(' ');
    let (old_start, old_lines) = parse_range(it.next()?, '-')?;
    let (new_start, new_lines) = parse_range(it.next()?, '+')?;
    if it.next().is_some() {
        return None;
    }

    let heading = tail.strip_prefix(' ').unwrap_or(tail);
    let heading = (!heading.is_empty()).then(|| heading.to_string());

    Some(HunkHeader {
        old_start,
        old_lines,
        new_start,
        new_lines,
        heading,
    })
}

/// Only an empty range may start at line 0, and `start + count` must fit in a `u32`.
fn parse_range(token: &str, sign: char) -> Option<(u32, u32)> {
    let token = token.strip_prefix(sign)?;
    let (start, count) = match token.split_once(',') {
        Some((start, count)) => (parse_number(start)?, parse_number(count)?),
        None => (parse_number(token)?, 1),
    };
    start.checked_add(count)?;
    (start > 0 || count == 0).then_some((start, count))
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Scan consecutive hunks until the next non-`@@` line.
pub(crate) fn scan_hunks(lines: &mut LineReader<'_>) -> Result<Vec<Hunk>, DiffParseError> {
    let mut hunks = Vec::new();

    while let Some(peeked) = lines.peek() {
        if !peeked.starts_with("@@") {
            break;
        }
        lines.next_line();
        let header_line = lines.line_no();
        let header =
            parse_hunk_header(peeked).ok_or_else(|| DiffParseError::MalformedHunkHeader {
                line: header_line,
                header: trim_cr(peeked).to_string(),
            })?;

        let hunk = scan_body(lines, header)?;
        debug!(
            "Scanned hunk -{},{} +{},{} ({} body lines) at line {}",
            hunk.old_start,
            hunk.old_lines,
            hunk.new_start,
            hunk.new_lines,
            hunk.lines.len(),
            header_line
        );
        hunks.push(hunk);
    }

    Ok(hunks)
}

fn scan_body(lines: &mut LineReader<'_>, header: HunkHeader) -> Result<Hunk, DiffParseError> {
    let mut body: Vec<DiffLine> = Vec::new();
    let mut old_seen: u32 = 0;
    let mut new_seen: u32 = 0;

    let mismatch = |line: usize, old_seen: u32, new_seen: u32| DiffParseError::CountMismatch {
        line,
        old_expected: header.old_lines,
        new_expected: header.new_lines,
        old_seen,
        new_seen,
    };

    while old_seen < header.old_lines || new_seen < header.new_lines {
        let Some(raw) = lines.next_line() else {
            return Err(DiffParseError::Truncated {
                line: lines.line_no(),
                old_remaining: header.old_lines - old_seen,
                new_remaining: header.new_lines - new_seen,
            });
        };
        let line_no = lines.line_no();

        let kind = match raw.as_bytes().first() {
            Some(b' ') => LineKind::Context,
            Some(b'-') => LineKind::Deletion,
            Some(b'+') => LineKind::Addition,
            Some(b'\\') => {
                mark_no_newline(&mut body, line_no)?;
                continue;
            }
            // Empty context lines often lose their leading space.
            None | Some(b'\r') if trim_cr(raw).is_empty() => LineKind::Context,
            _ if raw.starts_with("@@") || raw.starts_with("diff ") => {
                return Err(mismatch(line_no, old_seen, new_seen));
            }
            _ => {
                return Err(DiffParseError::UnexpectedHunkLine {
                    line: line_no,
                    content: raw.to_string(),
                });
            }
        };

        let fits = match kind {
            LineKind::Context => old_seen < header.old_lines && new_seen < header.new_lines,
            LineKind::Deletion => old_seen < header.old_lines,
            LineKind::Addition => new_seen < header.new_lines,
        };
        if !fits {
            return Err(mismatch(line_no, old_seen, new_seen));
        }

        if kind != LineKind::Addition {
            old_seen += 1;
        }
        if kind != LineKind::Deletion {
            new_seen += 1;
        }

        let text = raw.get(1..).unwrap_or("");
        let text = if trim_cr(raw).is_empty() { "" } else { text };
        body.push(DiffLine::new(kind, text));
    }

    // The notice for the final line comes after the counts are used up.
    if lines.peek().is_some_and(|l| l.starts_with('\\')) {
        lines.next_line();
        mark_no_newline(&mut body, lines.line_no())?;
    }

    if let Some(next) = lines.peek() {
        if is_stray_body_line(next) {
            return Err(mismatch(lines.line_no() + 1, old_seen, new_seen));
        }
    }

    Ok(Hunk {
        old_start: header.old_start,
        old_lines: header.old_lines,
        new_start: header.new_start,
        new_lines: header.new_lines,
        heading: header.heading,
        lines: body,
    })
}

fn mark_no_newline(body: &mut [DiffLine], line: usize) -> Result<(), DiffParseError> {
    match body.last_mut() {
        Some(prev) => {
            prev.no_newline_at_eof = true;
            Ok(())
        }
        None => Err(DiffParseError::OrphanNoNewlineMarker { line }),
    }
}

/// A body-looking line right after a complete hunk means the header undercounted.
///
/// `--- ` opens the next file section and `-- ` is the `git format-patch`
/// signature separator, so neither counts.
fn is_stray_body_line(line: &str) -> bool {
    let line = trim_cr(line);
    if line.starts_with("--- ") || line == "-- " {
        return false;
    }
    matches!(line.as_bytes().first(), Some(b' ' | b'+' | b'-'))
}
