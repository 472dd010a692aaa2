use diffsuggest_types::{Diagnostic, DiagnosticResult};

/// One compact JSON diagnostic per line (rdjsonl).
pub fn render_rdjsonl(diagnostics: &[Diagnostic]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for d in diagnostics {
        out.push_str(&serde_json::to_string(d)?);
        out.push('\n');
    }
    Ok(out)
}

/// The rdjson envelope, pretty-printed.
pub fn render_rdjson(result: &DiagnosticResult) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(result)?;
    out.push('\n');
    Ok(out)
}

/// Each diagnostic's `originalOutput`, for consumers that cannot apply edits.
pub fn render_text(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        out.push_str(&d.original_output);
        out.push('\n');
    }
    out
}

/// A review-comment style summary with a `suggestion` block per diagnostic.
pub fn render_markdown(result: &DiagnosticResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {} suggestions\n\n", result.source.name));

    if result.diagnostics.is_empty() {
        out.push_str("No suggestions.\n");
        return out;
    }

    for d in &result.diagnostics {
        let range = &d.location.range;
        let loc = if range.start.line == range.end.line {
            format!("{}:{}", d.location.path, range.start.line)
        } else {
            format!("{}:{}-{}", d.location.path, range.start.line, range.end.line)
        };
        out.push_str(&format!("### `{}`\n\n", escape_md(&loc)));

        for s in &d.suggestions {
            let text = s.text.as_deref().unwrap_or("");
            let fence = fence_for(text);
            out.push_str(&format!("{fence}suggestion\n"));
            out.push_str(text);
            if !text.is_empty() && !text.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&format!("{fence}\n\n"));
        }
    }

    out
}

/// Backtick fence longer than any run inside `text`.
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat(longest.max(2) + 1)
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('`', "\\`")
}
