//! Common test fixtures for diffsuggest.
//!
//! This module provides sample diffs, runner configs, and the diagnostics
//! the sample diffs are expected to produce.

use diffsuggest_types::{Diagnostic, Location, Position, Range, Suggestion};

// =============================================================================
// Sample Diffs
// =============================================================================

/// Collection of sample diffs for testing.
pub mod sample_diffs {
    /// A gofmt rewrite: one replacement, one multi-line replacement,
    /// one insertion and one deletion. Headers carry timestamps.
    pub fn gofmt() -> &'static str {
        concat!(
            "diff --git a/gofmt.go b/gofmt.go\n",
            "--- a/gofmt.go\t2020-07-26 08:01:09.260800318 +0000\n",
            "+++ b/gofmt.go\t2020-07-26 08:01:09.260800318 +0000\n",
            "@@ -1,6 +1,6 @@\n",
            " package testdata\n",
            " \n",
            "-func    fmt     () {\n",
            "+func fmt() {\n",
            " \t// test\n",
            " \t// test line\n",
            " \t// test line\n",
            "@@ -10,11 +10,11 @@\n",
            " \t// test line\n",
            " \t// test line\n",
            " \n",
            "-println(\n",
            "-\t\t\"hello, gofmt test\"    )\n",
            "-//comment\n",
            "+\tprintln(\n",
            "+\t\t\"hello, gofmt test\")\n",
            "+\t//comment\n",
            " }\n",
            " \n",
            "+type s struct{ A int }\n",
            " \n",
            "-type s struct { A int }\n",
            " func (s s) String() { return \"s\" }\n",
        )
    }

    /// The old file lacks a final newline, the new file has one.
    pub fn add_newline() -> &'static str {
        concat!(
            "diff --git a/newline.txt b/newline.txt\n",
            "--- a/newline.txt\t2024-10-10 20:15:37.618432000 +0900\n",
            "+++ b/newline.txt\t2024-10-10 20:15:02.110606546 +0900\n",
            "@@ -1,2 +1,2 @@\n",
            " No newline at end of the old file only\n",
            "-a\n",
            "\\ No newline at end of file\n",
            "+a\n",
        )
    }

    /// The new file lacks a final newline, the old file has one.
    pub fn remove_newline() -> &'static str {
        concat!(
            "diff --git a/newline.txt b/newline.txt\n",
            "--- a/newline.txt\t2024-10-10 20:15:37.618432000 +0900\n",
            "+++ b/newline.txt\t2024-10-10 20:15:02.110606546 +0900\n",
            "@@ -1,2 +1,2 @@\n",
            " No newline at end of the new file only\n",
            "-a\n",
            "+a\n",
            "\\ No newline at end of file\n",
        )
    }

    /// Neither file ends with a newline.
    pub fn keep_no_newline() -> &'static str {
        concat!(
            "diff --git a/newline.txt b/newline.txt\n",
            "--- a/newline.txt\t2024-10-10 20:15:37.618432000 +0900\n",
            "+++ b/newline.txt\t2024-10-10 20:15:02.110606546 +0900\n",
            "@@ -1,2 +1,2 @@\n",
            " No newline at end of both the old and new file\n",
            "-a\n",
            "\\ No newline at end of file\n",
            "+b\n",
            "\\ No newline at end of file\n",
        )
    }

    /// The unchanged last line has no newline; the change is above it.
    pub fn no_change_last_line() -> &'static str {
        concat!(
            "diff --git a/newline.txt b/newline.txt\n",
            "--- a/newline.txt\t2024-10-10 20:15:37.618432000 +0900\n",
            "+++ b/newline.txt\t2024-10-10 20:15:02.110606546 +0900\n",
            "@@ -1,3 +1,3 @@\n",
            " No newline at end of both the old and new file\n",
            "-a\n",
            "+b\n",
            " Last line\n",
            "\\ No newline at end of file\n",
        )
    }

    /// Two hunks whose old and new counts differ, so the second hunk's
    /// new-file start is shifted by the first.
    pub fn multi_hunk_unequal() -> &'static str {
        r#"diff --git a/src/lib.rs b/src/lib.rs
index 0000000..1111111 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,4 @@
 fn first() {}
+fn second() {}
+fn third() {}
 fn fourth() {}
@@ -10,3 +12,2 @@
 fn tenth() {}
-fn eleventh() {}
-fn twelfth() {}
+fn merged() {}
"#
    }

    /// Two files in one stream.
    pub fn multiple_files() -> &'static str {
        r#"diff --git a/src/a.rs b/src/a.rs
index 0000000..1111111 100644
--- a/src/a.rs
+++ b/src/a.rs
@@ -1,1 +1,2 @@
 fn a() {}
+fn a_new() {}
diff --git a/src/b.rs b/src/b.rs
index 0000000..1111111 100644
--- a/src/b.rs
+++ b/src/b.rs
@@ -1,1 +1,1 @@
-fn b() {}
+fn b_new() {}
"#
    }

    /// A binary change followed by a text change.
    pub fn binary_file() -> &'static str {
        r#"diff --git a/image.png b/image.png
index 0000000..1111111 100644
Binary files a/image.png and b/image.png differ
diff --git a/src/lib.rs b/src/lib.rs
index 0000000..1111111 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,1 +1,2 @@
 fn existing() {}
+fn new_function() {}
"#
    }

    /// A deleted file and a created file.
    pub fn deleted_and_new_file() -> &'static str {
        r#"diff --git a/old.rs b/old.rs
deleted file mode 100644
index 1111111..0000000
--- a/old.rs
+++ /dev/null
@@ -1,2 +0,0 @@
-fn old() {}
-fn deprecated() {}
diff --git a/new.rs b/new.rs
new file mode 100644
index 0000000..1111111
--- /dev/null
+++ b/new.rs
@@ -0,0 +1,1 @@
+fn new() {}
"#
    }

    /// Only context lines.
    pub fn context_only() -> &'static str {
        r#"--- a/same.txt
+++ b/same.txt
@@ -4,2 +4,2 @@
 four
 five
"#
    }

    /// The hunk header declares more lines than the body has.
    pub fn truncated_hunk() -> &'static str {
        r#"--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,3 @@
 fn a() {}
-fn b() {}
"#
    }

    /// A hunk header that cannot be parsed.
    pub fn malformed_hunk() -> &'static str {
        r#"--- a/src/lib.rs
+++ b/src/lib.rs
@@ -x,1 +1,1 @@
-a
+b
"#
    }

    /// Empty diff.
    pub fn empty() -> &'static str {
        ""
    }
}

// =============================================================================
// Sample Configs
// =============================================================================

/// Collection of sample runner configs for testing.
pub mod sample_configs {
    /// Three runners; `namekey` overrides its name.
    pub fn reviewdog_yml() -> &'static str {
        r#"
# reviewdog.yml

runner:
  golint:
    cmd: golint ./...
    errorformat: "%f:%l:%c: %m"
  govet:
    cmd: go tool vet -all -shadowstrict .
    format: govet
  namekey:
    cmd: echo 'name'
    name: nameoverwritten
    format: checkstyle
"#
    }

    /// A runner with a key the config format does not define.
    pub fn unknown_key() -> &'static str {
        r#"
runner:
  golint:
    cmd: golint ./...
    severity: high
"#
    }
}

// =============================================================================
// Expected Diagnostics
// =============================================================================

/// Diagnostics the sample diffs produce with `strip = 1`.
pub mod expected {
    use super::*;

    fn diagnostic(path: &str, range: Range, text: Option<&str>, original_output: &str) -> Diagnostic {
        Diagnostic {
            location: Location {
                path: path.to_string(),
                range,
            },
            suggestions: vec![Suggestion {
                range,
                text: text.map(str::to_string),
            }],
            original_output: original_output.to_string(),
        }
    }

    /// Diagnostics for [`super::sample_diffs::gofmt`].
    pub fn gofmt() -> Vec<Diagnostic> {
        vec![
            diagnostic(
                "gofmt.go",
                Range::lines(3, 3),
                Some("func fmt() {"),
                "gofmt.go:3:-func    fmt     () {\ngofmt.go:3:+func fmt() {",
            ),
            diagnostic(
                "gofmt.go",
                Range::lines(13, 15),
                Some("\tprintln(\n\t\t\"hello, gofmt test\")\n\t//comment"),
                "gofmt.go:13:-println(\n\
                 gofmt.go:14:-\t\t\"hello, gofmt test\"    )\n\
                 gofmt.go:15:-//comment\n\
                 gofmt.go:13:+\tprintln(\n\
                 gofmt.go:14:+\t\t\"hello, gofmt test\")\n\
                 gofmt.go:15:+\t//comment",
            ),
            diagnostic(
                "gofmt.go",
                Range::point(Position::with_column(18, 1)),
                Some("type s struct{ A int }\n"),
                "gofmt.go:18:+type s struct{ A int }",
            ),
            diagnostic(
                "gofmt.go",
                Range::lines(19, 19),
                None,
                "gofmt.go:19:-type s struct { A int }",
            ),
        ]
    }

    /// The single diagnostic each newline sample produces.
    pub fn newline_replacement(old: &str, new: &str, text: &str) -> Diagnostic {
        diagnostic(
            "newline.txt",
            Range::lines(2, 2),
            Some(text),
            &format!("newline.txt:2:-{old}\nnewline.txt:2:+{new}"),
        )
    }
}
