//! Property-based tests for diffsuggest-diff
//!
//! These tests check that the splitter and hunk scanner recover exactly the
//! files and hunk bodies a well-formed diff was built from, and that broken
//! counts or strip levels are reported instead of silently accepted.

use proptest::prelude::*;

use diffsuggest_diff::{split_files, DiffParseError, FileStatus, LineKind};
use diffsuggest_testkit::arb::{arb_diff_spec, arb_hunk_body, DiffSpec};
use diffsuggest_testkit::diff_builder::{DiffBuilder, FileBuilder, HunkBuilder, HunkLine};

fn expected_kinds(body: &[HunkLine]) -> Vec<(LineKind, String)> {
    body.iter()
        .filter_map(|l| match l {
            HunkLine::Context(c) => Some((LineKind::Context, c.clone())),
            HunkLine::Add(c) => Some((LineKind::Addition, c.clone())),
            HunkLine::Remove(c) => Some((LineKind::Deletion, c.clone())),
            HunkLine::NoNewline => None,
        })
        .collect()
}

// ============================================================================
// Splitter and scanner recover the built structure
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn files_come_back_in_input_order(spec in arb_diff_spec()) {
        let files = split_files(&spec.build(), 1).unwrap();
        let want: Vec<&str> = spec.files.iter().map(|(p, _)| p.as_str()).collect();
        let got: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        prop_assert_eq!(got, want);
        prop_assert!(files.iter().all(|f| f.status == FileStatus::Modified));
    }

    #[test]
    fn hunk_bodies_round_trip(spec in arb_diff_spec()) {
        let files = split_files(&spec.build(), 1).unwrap();

        for (file, (_, hunks)) in files.iter().zip(&spec.files) {
            prop_assert_eq!(file.hunks.len(), hunks.len());
            for (got, want) in file.hunks.iter().zip(hunks) {
                let (old, new) = want.builder().body_counts();
                prop_assert_eq!(got.old_start, want.old_start);
                prop_assert_eq!(got.new_start, want.new_start);
                prop_assert_eq!((got.old_lines, got.new_lines), (old, new));

                let kinds: Vec<(LineKind, String)> =
                    got.lines.iter().map(|l| (l.kind, l.text.clone())).collect();
                prop_assert_eq!(kinds, expected_kinds(&want.body));
                prop_assert!(got.lines.iter().all(|l| !l.no_newline_at_eof));
            }
        }
    }

    #[test]
    fn body_counts_reconcile_with_header(spec in arb_diff_spec()) {
        for file in split_files(&spec.build(), 1).unwrap() {
            for hunk in &file.hunks {
                let old = hunk.lines.iter().filter(|l| l.kind != LineKind::Addition).count();
                let new = hunk.lines.iter().filter(|l| l.kind != LineKind::Deletion).count();
                prop_assert_eq!(old as u32, hunk.old_lines);
                prop_assert_eq!(new as u32, hunk.new_lines);
            }
        }
    }

    #[test]
    fn strip_zero_keeps_prefix(spec in arb_diff_spec()) {
        let files = split_files(&spec.build(), 0).unwrap();
        for (file, (path, _)) in files.iter().zip(&spec.files) {
            prop_assert_eq!(&file.path, &format!("b/{path}"));
        }
    }

    #[test]
    fn strip_past_last_segment_is_a_path_error(spec in arb_diff_spec()) {
        let deepest = spec
            .files
            .iter()
            .map(|(p, _)| p.split('/').count())
            .max()
            .unwrap_or(1);
        // "b/" adds one segment; stripping all of them leaves nothing.
        let err = split_files(&spec.build(), deepest + 1).unwrap_err();
        prop_assert!(err.is_path_error());
    }

    #[test]
    fn empty_context_lines_may_lose_their_space(spec in arb_diff_spec()) {
        let text = spec.build();
        let squeezed = text.replace("\n \n", "\n\n");
        prop_assert_eq!(split_files(&squeezed, 1).unwrap(), split_files(&text, 1).unwrap());
    }

    #[test]
    fn overcounted_header_is_truncation(body in arb_hunk_body()) {
        let (old, new) = HunkBuilder::from_lines(1, 1, body.clone()).body_counts();
        let mut hunk = HunkBuilder::new(1, old + 1, 1, new + 1);
        for line in body {
            hunk = match line {
                HunkLine::Context(c) => hunk.context(&c),
                HunkLine::Add(c) => hunk.add_line(&c),
                HunkLine::Remove(c) => hunk.remove(&c),
                HunkLine::NoNewline => hunk.no_newline(),
            };
        }
        let diff = DiffBuilder::new()
            .add_file(FileBuilder::new("x.txt").add_hunk(hunk))
            .build();

        let err = split_files(&diff, 1).unwrap_err();
        let is_truncated = matches!(err, DiffParseError::Truncated { .. });
        prop_assert!(is_truncated, "unexpected error: {err}");
    }

    #[test]
    fn splitting_is_deterministic(spec in arb_diff_spec()) {
        let text = spec.build();
        prop_assert_eq!(split_files(&text, 1).unwrap(), split_files(&text, 1).unwrap());
    }
}

// ============================================================================
// Builder-driven scenarios
// ============================================================================

#[test]
fn no_newline_notices_attach_to_previous_line() {
    let diff = DiffBuilder::new()
        .file("newline.txt")
        .hunk_at(1, 1)
        .context("first")
        .remove("a")
        .no_newline()
        .add_line("b")
        .no_newline()
        .done()
        .done()
        .build();

    let files = split_files(&diff, 1).unwrap();
    let lines = &files[0].hunks[0].lines;
    assert_eq!(lines.len(), 3);
    assert!(!lines[0].no_newline_at_eof);
    assert!(lines[1].no_newline_at_eof);
    assert!(lines[2].no_newline_at_eof);
}

#[test]
fn rename_keeps_old_path() {
    let diff = DiffBuilder::new()
        .file("src/new_name.rs")
        .rename_from("src/old_name.rs")
        .hunk_at(1, 1)
        .remove("a")
        .add_line("b")
        .done()
        .done()
        .build();

    let files = split_files(&diff, 1).unwrap();
    assert_eq!(files[0].path, "src/new_name.rs");
    assert_eq!(files[0].old_path.as_deref(), Some("src/old_name.rs"));
    assert_eq!(files[0].status, FileStatus::Renamed);
}

#[test]
fn plain_diff_with_timestamps_has_clean_paths() {
    let diff = DiffBuilder::new()
        .file("dir/x.txt")
        .without_git_header()
        .timestamp("2024-10-10 20:15:37.618432000 +0900")
        .hunk_at(3, 3)
        .context("x")
        .add_line("y")
        .done()
        .done()
        .build();

    let files = split_files(&diff, 1).unwrap();
    assert_eq!(files[0].path, "dir/x.txt");
}

#[test]
fn deleted_and_created_files_get_status() {
    let diff = DiffBuilder::new()
        .file("old.rs")
        .deleted()
        .hunk_at(1, 0)
        .remove("fn old() {}")
        .done()
        .done()
        .file("new.rs")
        .new_file()
        .hunk_at(0, 1)
        .add_line("fn new() {}")
        .done()
        .done()
        .build();

    let files = split_files(&diff, 1).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!((files[0].path.as_str(), files[0].status), ("old.rs", FileStatus::Deleted));
    assert_eq!((files[1].path.as_str(), files[1].status), ("new.rs", FileStatus::Added));
}

#[test]
fn generated_spec_builds_git_headers() {
    let spec = DiffSpec {
        files: vec![("a.rs".to_string(), vec![])],
    };
    assert_eq!(
        spec.build(),
        "diff --git a/a.rs b/a.rs\nindex 0000000..1111111 100644\n--- a/a.rs\n+++ b/a.rs\n"
    );
}
