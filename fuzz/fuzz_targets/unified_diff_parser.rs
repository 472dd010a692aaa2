//! Fuzz target for unified diff parsing.
//!
//! Raw bytes exercise the splitter and scanner on arbitrary input. The
//! structured mode builds a header whose counts match a generated body, so
//! the diagnostic builder sees well-formed hunks with random content.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use diffsuggest_core::DiffParser;

#[derive(Arbitrary, Debug)]
enum FuzzLine {
    Context(String),
    Add(String),
    Remove(String),
    NoNewline,
}

#[derive(Arbitrary, Debug)]
struct FuzzHunk {
    old_start: u16,
    new_start: u16,
    lines: Vec<FuzzLine>,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    use_structured: bool,
    strip: u8,
    raw_bytes: Vec<u8>,
    hunks: Vec<FuzzHunk>,
}

fn clean(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

fn render(hunks: &[FuzzHunk]) -> String {
    let mut out = String::from("diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n");
    for h in hunks {
        let mut old = 0u32;
        let mut new = 0u32;
        let mut body = String::new();
        for line in &h.lines {
            match line {
                FuzzLine::Context(s) => {
                    old += 1;
                    new += 1;
                    body.push_str(&format!(" {}\n", clean(s)));
                }
                FuzzLine::Add(s) => {
                    new += 1;
                    body.push_str(&format!("+{}\n", clean(s)));
                }
                FuzzLine::Remove(s) => {
                    old += 1;
                    body.push_str(&format!("-{}\n", clean(s)));
                }
                FuzzLine::NoNewline => body.push_str("\\ No newline at end of file\n"),
            }
        }
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n{}",
            h.old_start.max(1),
            old,
            h.new_start.max(1),
            new,
            body
        ));
    }
    out
}

fuzz_target!(|input: FuzzInput| {
    let text = if input.use_structured {
        render(&input.hunks)
    } else {
        String::from_utf8_lossy(&input.raw_bytes).into_owned()
    };

    let parser = DiffParser::new(usize::from(input.strip % 4));
    let first = parser.parse(&text);
    let second = parser.parse(&text);

    match (&first, &second) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a, b, "parse must be deterministic");
            for d in a {
                assert!(d.location.range.start.line >= 1);
                assert!(d.location.range.end.line >= d.location.range.start.line);
                for s in &d.suggestions {
                    assert_eq!(s.range, d.location.range);
                }
            }
        }
        (Err(_), Err(_)) => {}
        _ => panic!("parse must be deterministic"),
    }
});
