//! Multisplit engine tests: keep modes, strip modes, reverse scanning,
//! and the reconstruction laws.

use proptest::prelude::*;
use rstest::rstest;

use strand::{
    multipartition, multirpartition, multisplit, multistrip, Keep, Separators, SplitError, Strip,
};

#[test]
fn overlapping_separators_split_greedily() {
    let pieces = multisplit("wxabcyz", &["a", "abc"]).segments().unwrap();
    assert_eq!(pieces, vec!["wx", "yz"]);
}

#[test]
fn keep_attached_reconstructs_input() {
    let input = "one, two,three , four";
    let pieces = multisplit(input, &[",", " "])
        .keep(Keep::Attached)
        .segments()
        .unwrap();
    assert_eq!(pieces.concat(), input);
}

#[test]
fn keep_alternating_starts_and_ends_with_nonsep() {
    let pieces = multisplit("-a-", &["-"])
        .keep(Keep::Alternating)
        .separate(true)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["", "-", "a", "-", ""]);
}

#[test]
fn as_pairs_ends_with_empty_separator() {
    let pairs = multisplit("a-b-", &["-"]).separate(true).pairs().unwrap();
    assert_eq!(
        pairs,
        vec![
            ("a".to_string(), "-".to_string()),
            ("b".to_string(), "-".to_string()),
            ("".to_string(), "".to_string()),
        ]
    );
}

#[test]
fn separate_false_merges_adjacent_separators() {
    let pieces = multisplit("a--b", &["-"])
        .keep(Keep::Alternating)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["a", "--", "b"]);
}

#[test]
fn separate_true_yields_empty_between_adjacent_separators() {
    let pieces = multisplit("a--b", &["-"])
        .keep(Keep::Alternating)
        .separate(true)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["a", "-", "", "-", "b"]);
}

#[test]
fn empty_separator_collection_is_an_error() {
    let empty: &[&str] = &[];
    assert_eq!(
        multisplit("abc", empty).segments().unwrap_err(),
        SplitError::EmptySeparators
    );
}

#[test]
fn empty_input_yields_one_empty_piece() {
    assert_eq!(multisplit("", &[","]).segments().unwrap(), vec![""]);
}

#[test]
fn maxsplit_zero_yields_input_unchanged() {
    assert_eq!(
        multisplit("a,b,c", &[","]).maxsplit(0).segments().unwrap(),
        vec!["a,b,c"]
    );
}

#[rstest]
#[case(1, vec!["a", "b,c"])]
#[case(2, vec!["a", "b", "c"])]
#[case(5, vec!["a", "b", "c"])]
fn maxsplit_bounds_the_number_of_splits(#[case] maxsplit: usize, #[case] expected: Vec<&str>) {
    let pieces = multisplit("a,b,c", &[","])
        .maxsplit(maxsplit)
        .segments()
        .unwrap();
    assert_eq!(pieces, expected);
}

#[test]
fn reverse_maxsplit_counts_from_the_right() {
    let pieces = multisplit("a,b,c", &[","])
        .maxsplit(1)
        .reverse(true)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["a,b", "c"]);
}

#[test]
fn reverse_overlap_prefers_rightmost_separator() {
    let pieces = multisplit("A x x Z", &[" x "])
        .keep(Keep::Alternating)
        .reverse(true)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["A x", " x ", "Z"]);
}

#[test]
fn forward_overlap_prefers_leftmost_separator() {
    let pieces = multisplit("A x x Z", &[" x "])
        .keep(Keep::Alternating)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["A", " x ", "x Z"]);
}

#[test]
fn progressive_strip_reproduces_python_whitespace_split() {
    let pieces = multisplit("  a b c  ", Separators::<str>::whitespace())
        .maxsplit(2)
        .strip(Strip::Progressive)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["a", "b", "c  "]);

    let pieces = multisplit("  a b c  ", Separators::<str>::whitespace())
        .maxsplit(3)
        .strip(Strip::Progressive)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["a", "b", "c"]);
}

#[test]
fn strip_both_trims_separators_from_both_ends() {
    let pieces = multisplit("--a-b--", &["-"])
        .strip(Strip::Both)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec!["a", "b"]);
}

#[test]
fn all_separator_input_stripped_yields_one_empty_piece() {
    let pieces = multisplit("---", &["-"])
        .strip(Strip::Both)
        .segments()
        .unwrap();
    assert_eq!(pieces, vec![""]);
}

#[test]
fn bytes_and_str_agree_on_ascii_input() {
    let str_pieces = multisplit("a,b;c", &[",", ";"]).segments().unwrap();
    let byte_separators: &[&[u8]] = &[b",", b";"];
    let byte_pieces = multisplit(b"a,b;c".as_slice(), byte_separators)
        .segments()
        .unwrap();
    let decoded: Vec<String> = byte_pieces
        .iter()
        .map(|b| String::from_utf8(b.clone()).unwrap())
        .collect();
    assert_eq!(str_pieces, decoded);
}

#[test]
fn single_text_separator_splits_on_each_unit() {
    let pieces = multisplit("a1b2c", "12").segments().unwrap();
    assert_eq!(pieces, vec!["a", "b", "c"]);
}

#[test]
fn multipartition_scenario() {
    let parts = multipartition("aXYbYXc", &["X", "Y"], 2).unwrap();
    assert_eq!(parts, vec!["a", "X", "", "Y", "bYXc"]);
}

#[test]
fn multipartition_pads_on_the_right() {
    let parts = multipartition("aXb", &["X", "Y"], 3).unwrap();
    assert_eq!(parts, vec!["a", "X", "b", "", "", "", ""]);
}

#[test]
fn multipartition_length_is_always_2n_plus_1() {
    for count in 0..5 {
        let parts = multipartition("aXbYc", &["X", "Y"], count).unwrap();
        assert_eq!(parts.len(), 2 * count + 1);
    }
}

#[test]
fn multirpartition_pads_on_the_left() {
    let parts = multirpartition("aXb", &["X", "Y"], 3).unwrap();
    assert_eq!(parts, vec!["", "", "", "", "a", "X", "b"]);
}

#[test]
fn multistrip_is_greedy_and_sided() {
    assert_eq!(
        multistrip("xyxABCyx", &["x", "y", "yx"], true, true).unwrap(),
        "ABC"
    );
    assert_eq!(
        multistrip("xxABCxx", &["x"], true, false).unwrap(),
        "ABCxx"
    );
    assert_eq!(
        multistrip("xxABCxx", &["x"], false, true).unwrap(),
        "xxABC"
    );
    assert_eq!(
        multistrip("xxABCxx", &["x"], false, false).unwrap(),
        "xxABCxx"
    );
}

proptest! {
    #[test]
    fn attached_pieces_always_reconstruct_the_input(s in "[ab\\-_ ]{0,40}") {
        let pieces = multisplit(s.as_str(), &["-", "_", " "])
            .keep(Keep::Attached)
            .segments()
            .unwrap();
        prop_assert_eq!(pieces.concat(), s);
    }

    #[test]
    fn alternating_pieces_always_reconstruct_the_input(s in "[ab\\-_ ]{0,40}") {
        let pieces = multisplit(s.as_str(), &["-", "_", " "])
            .keep(Keep::Alternating)
            .separate(true)
            .segments()
            .unwrap();
        prop_assert_eq!(pieces.concat(), s);
    }

    #[test]
    fn pairs_always_reconstruct_the_input(s in "[ab\\-_ ]{0,40}") {
        let pairs = multisplit(s.as_str(), &["-", "_", " "])
            .separate(true)
            .pairs()
            .unwrap();
        let mut rebuilt = String::new();
        for (piece, sep) in pairs {
            rebuilt.push_str(&piece);
            rebuilt.push_str(&sep);
        }
        prop_assert_eq!(rebuilt, s);
    }

    #[test]
    fn reverse_and_forward_agree_without_overlaps(s in "[abc,;]{0,40}") {
        let forward = multisplit(s.as_str(), &[",", ";"]).segments().unwrap();
        let reverse = multisplit(s.as_str(), &[",", ";"]).reverse(true).segments().unwrap();
        prop_assert_eq!(forward, reverse);
    }
}
