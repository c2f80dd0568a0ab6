use super::*;
use proptest::prelude::*;

fn rebuild_after(ops: &[TextDiffOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != DiffKind::Delete)
        .map(|op| op.text.as_str())
        .collect()
}

fn rebuild_before(ops: &[TextDiffOp]) -> String {
    ops.iter()
        .filter(|op| op.kind != DiffKind::Insert)
        .map(|op| op.text.as_str())
        .collect()
}

fn shape(ops: &[TextDiffOp]) -> Vec<(DiffKind, usize)> {
    ops.iter().map(|op| (op.kind, op.count)).collect()
}

#[test]
fn identical_input_is_a_single_equal_op() {
    let ops = diff_chars("hello world", "hello world");
    assert_eq!(shape(&ops), vec![(DiffKind::Equal, 11)]);
    let ops = diff_sequence(&[1, 2, 3], &[1, 2, 3]);
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].items, vec![1, 2, 3]);
}

#[test]
fn empty_inputs() {
    assert!(diff_sequence::<u8>(&[], &[]).is_empty());
    assert_eq!(shape(&diff_chars("", "abc")), vec![(DiffKind::Insert, 3)]);
    assert_eq!(shape(&diff_chars("abc", "")), vec![(DiffKind::Delete, 3)]);
}

#[test]
fn one_empty_side_is_a_single_op_even_when_long() {
    let long: Vec<char> = "x".repeat(200_000).chars().collect();

    let ops = diff_sequence(&[], &long);
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind, DiffKind::Insert);
    assert_eq!(ops[0].items, long);

    let ops = diff_sequence(&long, &[]);
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind, DiffKind::Delete);
    assert_eq!(ops[0].len(), 200_000);
}

#[test]
fn replaced_middle_run_is_one_delete_and_one_insert() {
    let before = format!("aaaaaa{}zz", "b".repeat(14));
    let after = format!("aaaaaa{}zz", "c".repeat(14));
    let ops = diff_chars(&before, &after);
    assert_eq!(
        shape(&ops),
        vec![
            (DiffKind::Equal, 6),
            (DiffKind::Delete, 14),
            (DiffKind::Insert, 14),
            (DiffKind::Equal, 2),
        ]
    );
    assert_eq!(ops[2].text, "c".repeat(14));
    assert_eq!(ops[0].text, "aaaaaa");
    assert_eq!(ops[3].text, "zz");
}

#[test]
fn separate_regions_stay_separate() {
    let before = format!("aaaaaa{}zzzz{}", "b".repeat(5), "c".repeat(4));
    let after = format!("aaaaaa{}zzzz{}", "B".repeat(5), "C".repeat(4));
    let ops = diff_chars(&before, &after);
    assert_eq!(
        shape(&ops),
        vec![
            (DiffKind::Equal, 6),
            (DiffKind::Delete, 5),
            (DiffKind::Insert, 5),
            (DiffKind::Equal, 4),
            (DiffKind::Delete, 4),
            (DiffKind::Insert, 4),
        ]
    );
    assert_eq!(ops[3].text, "zzzz");
}

#[test]
fn chars_are_unicode_scalars() {
    let ops = diff_chars("naïve café", "naive cafè");
    assert_eq!(rebuild_after(&ops), "naive cafè");
    assert_eq!(rebuild_before(&ops), "naïve café");
    let deleted: usize = ops
        .iter()
        .filter(|op| op.kind == DiffKind::Delete)
        .map(|op| op.count)
        .sum();
    assert_eq!(deleted, 2);
}

#[test]
fn line_diff_handles_crlf_and_trailing_newline() {
    assert_eq!(split_lines("a\r\nb\n"), vec!["a", "b", ""]);
    assert_eq!(split_lines(""), vec![""]);
    let ops = diff_lines("a\nb\nc\n", "a\r\nB\r\nc\r\n");
    let kinds: Vec<DiffKind> = ops.iter().map(|op| op.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiffKind::Equal,
            DiffKind::Delete,
            DiffKind::Insert,
            DiffKind::Equal
        ]
    );
    assert_eq!(ops[3].items, vec!["c".to_string(), String::new()]);
}

#[test]
fn pure_insertion_and_deletion_of_lines() {
    let ops = diff_lines("a\nc", "a\nb\nc");
    assert_eq!(ops.len(), 3);
    assert_eq!(ops[1].kind, DiffKind::Insert);
    assert_eq!(ops[1].items, vec!["b".to_string()]);

    let ops = diff_lines("a\nb\nc", "a\nc");
    assert_eq!(ops[1].kind, DiffKind::Delete);
    assert_eq!(ops[1].items, vec!["b".to_string()]);
}

// Length of the longest common subsequence, by dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for x in a {
        let mut diag = 0;
        for (j, y) in b.iter().enumerate() {
            let up = row[j + 1];
            row[j + 1] = if x == y {
                diag + 1
            } else {
                up.max(row[j])
            };
            diag = up;
        }
    }
    row[b.len()]
}

proptest! {
    #[test]
    fn prop_round_trip_both_directions(a in "[abc\n]{0,24}", b in "[abc\n]{0,24}") {
        let ops = diff_chars(&a, &b);
        prop_assert_eq!(rebuild_after(&ops), b.clone());
        prop_assert_eq!(rebuild_before(&ops), a.clone());
    }

    #[test]
    fn prop_adjacent_ops_differ_in_kind(a in "[ab]{0,20}", b in "[ab]{0,20}") {
        let ops = diff_chars(&a, &b);
        for pair in ops.windows(2) {
            prop_assert_ne!(pair[0].kind, pair[1].kind);
        }
        prop_assert!(ops.iter().all(|op| op.count > 0));
    }

    #[test]
    fn prop_edit_script_is_shortest(a in "[xyz]{0,16}", b in "[xyz]{0,16}") {
        let ac: Vec<char> = a.chars().collect();
        let bc: Vec<char> = b.chars().collect();
        let ops = diff_chars(&a, &b);
        let equal: usize = ops
            .iter()
            .filter(|op| op.kind == DiffKind::Equal)
            .map(|op| op.count)
            .sum();
        prop_assert_eq!(equal, lcs_len(&ac, &bc));
    }
}
