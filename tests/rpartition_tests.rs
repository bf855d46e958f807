//! Reverse regex scanning and regex partitioning.

use strand::{re_partition, re_rpartition, reversed_re_finditer};

#[test]
fn reverse_scan_yields_right_preference_matches() {
    // The forward engine finds only `abcdef`; a true right-to-left
    // scanner finds these four.
    let spans = reversed_re_finditer("(abcdef|efg|ab|b|c|d)", "abcdefgh").unwrap();
    assert_eq!(spans, vec![(4, 7), (3, 4), (2, 3), (0, 2)]);
}

#[test]
fn reverse_scan_without_overlap_mirrors_forward_scan() {
    let spans = reversed_re_finditer("[0-9]+", "a12b345c6").unwrap();
    assert_eq!(spans, vec![(8, 9), (4, 7), (1, 3)]);
}

#[test]
fn reverse_scan_empty_when_no_matches() {
    assert_eq!(reversed_re_finditer("z", "abc").unwrap(), vec![]);
}

#[test]
fn reverse_scan_zero_length_matches() {
    // A zero-length-capable pattern matches at the far end too.
    let spans = reversed_re_finditer("a*", "ba").unwrap();
    assert_eq!(spans.first(), Some(&(1, 2)));
    assert!(spans.contains(&(0, 0)));
}

#[test]
fn re_partition_splits_at_the_leftmost_match() {
    let parts = re_partition::<str>("a1b2c", "[0-9]", 1, false).unwrap();
    assert_eq!(parts, vec!["a", "1", "b2c"]);
}

#[test]
fn re_partition_count_pads_on_the_right() {
    let parts = re_partition::<str>("a1b", "[0-9]", 3, false).unwrap();
    assert_eq!(parts, vec!["a", "1", "b", "", "", "", ""]);
}

#[test]
fn re_partition_count_zero_returns_input() {
    let parts = re_partition::<str>("a1b", "[0-9]", 0, false).unwrap();
    assert_eq!(parts, vec!["a1b"]);
}

#[test]
fn re_rpartition_overlapping_alternation_scenario() {
    let parts = re_partition::<str>("abcdefgh", "(abcdef|efg|ab|b|c|d)", 4, true).unwrap();
    assert_eq!(parts.len(), 9);
    assert_eq!(parts, vec!["", "ab", "", "c", "", "d", "", "efg", "h"]);
}

#[test]
fn re_rpartition_splits_at_the_rightmost_match() {
    let parts = re_rpartition::<str>("a1b2c", "[0-9]", 1).unwrap();
    assert_eq!(parts, vec!["a1b", "2", "c"]);
}

#[test]
fn re_rpartition_pads_on_the_left() {
    let parts = re_rpartition::<str>("a1b", "[0-9]", 3).unwrap();
    assert_eq!(parts, vec!["", "", "", "", "a", "1", "b"]);
}

#[test]
fn partition_reconstructs_input() {
    for count in 1..4 {
        let forward = re_partition::<str>("x1y22z333", "[0-9]+", count, false).unwrap();
        assert_eq!(forward.concat(), "x1y22z333");
        let reverse = re_rpartition::<str>("x1y22z333", "[0-9]+", count).unwrap();
        assert_eq!(reverse.concat(), "x1y22z333");
    }
}

#[test]
fn bytes_patterns_scan_too() {
    let spans = reversed_re_finditer("[0-9]+", b"a1b23".as_slice()).unwrap();
    assert_eq!(spans, vec![(3, 5), (1, 2)]);
}
