//! SourceString: provenance through slicing, concatenation, splitting,
//! replacement, and partitioning.

use strand::{Keep, Separators, SourceOptions, SourceString};

fn tracked(text: &str, source: &str) -> SourceString {
    SourceString::with_options(
        text,
        SourceOptions {
            source: Some(source.to_string()),
            ..SourceOptions::default()
        },
    )
    .unwrap()
}

#[test]
fn location_after_slicing_scenario() {
    let s = tracked("abc\ndef", "F");
    assert_eq!(s.slice(4, 7).location(), "F line 2 column 1");
}

#[test]
fn location_without_source_has_no_prefix() {
    let s = SourceString::new("abc");
    assert_eq!(s.location(), "line 1 column 1");
}

#[test]
fn line_number_options_offset_positions() {
    let s = SourceString::with_options(
        "abc\ndef",
        SourceOptions {
            line_number: 3,
            column_number: 5,
            ..SourceOptions::default()
        },
    )
    .unwrap();
    assert_eq!(s.line_number(), 3);
    assert_eq!(s.column_number(), 5);
    assert_eq!(s.slice(1, 3).column_number(), 6);
    assert_eq!(s.slice(4, 7).line_number(), 4);
    assert_eq!(s.slice(4, 7).column_number(), 1);
}

#[test]
fn column_number_must_not_precede_first_column() {
    assert!(SourceString::with_options(
        "x",
        SourceOptions {
            column_number: 0,
            first_column_number: 1,
            ..SourceOptions::default()
        },
    )
    .is_err());
}

#[test]
fn slicing_preserves_code_units_and_provenance() {
    let s = tracked("hello world", "f");
    let word = s.slice(6, 11);
    assert_eq!(word, "world");
    assert_eq!(word.offset(), 6);
    assert_eq!(word.column_number(), 7);
}

#[test]
fn empty_slice_keeps_its_position() {
    let s = tracked("abc\ndef", "f");
    let point = s.slice(5, 5);
    assert_eq!(point, "");
    assert_eq!(point.offset(), 5);
    assert_eq!(point.location(), "f line 2 column 2");
}

#[test]
fn concatenating_slices_fuses_and_preserves_the_original() {
    let s = tracked("abcdef", "f");
    let joined = &s.slice(0, 0) + &s.slice(0, 6);
    assert_eq!(joined, "abcdef");
    assert_eq!(joined.source(), Some("f"));
    assert_eq!(joined.offset(), 0);
}

#[test]
fn concatenation_across_origins_keeps_both() {
    let a = tracked("abcde", "foo");
    let b = tracked("vwxyz", "bar");
    let c = &a + &b;
    assert_eq!(c, "abcdevwxyz");
    assert_eq!(c.location(), "foo line 1 column 1");
    assert_eq!(c.slice(5, 10).location(), "bar line 1 column 1");
}

#[test]
fn cat_concatenates_in_one_pass() {
    let s = tracked("one two three", "f");
    let parts = [s.slice(0, 3), s.slice(3, 8), s.slice(8, 13)];
    let rebuilt = SourceString::cat(&parts);
    assert_eq!(rebuilt, "one two three");
    assert_eq!(rebuilt.offset(), 0);
}

#[test]
fn iteration_yields_positioned_characters() {
    let s = tracked("a\nb", "f");
    let positions: Vec<(usize, usize)> = s
        .iter()
        .map(|c| (c.line_number(), c.column_number()))
        .collect();
    assert_eq!(positions, vec![(1, 1), (1, 2), (2, 1)]);
}

#[test]
fn tab_expansion_in_columns() {
    let s = SourceString::new("\tx");
    assert_eq!(s.slice(1, 2).column_number(), 9);

    let narrow = SourceString::with_options(
        "\tx",
        SourceOptions {
            tab_width: 4,
            ..SourceOptions::default()
        },
    )
    .unwrap();
    assert_eq!(narrow.slice(1, 2).column_number(), 5);
}

#[test]
fn crlf_counts_as_one_linebreak() {
    let s = SourceString::new("a\r\nb");
    let b = s.slice(3, 4);
    assert_eq!(b.line_number(), 2);
    assert_eq!(b.column_number(), 1);
}

#[test]
fn replace_without_occurrence_returns_self() {
    let s = tracked("abc", "f");
    let replaced = s.replace("zz", "yy");
    assert_eq!(replaced.source(), Some("f"));
    assert_eq!(replaced.offset(), 0);
}

#[test]
fn replace_preserves_untouched_provenance() {
    let s = tracked("ab-cd", "f");
    let replaced = s.replace("-", "::");
    assert_eq!(replaced, "ab::cd");
    // "cd" still points into the original.
    assert_eq!(replaced.slice(4, 6).location(), "f line 1 column 4");
}

#[test]
fn case_mapping_returns_self_when_unchanged() {
    let s = tracked("abc", "f");
    let lowered = s.to_lowercase();
    assert_eq!(lowered.source(), Some("f"));

    let upper = s.to_uppercase();
    assert_eq!(upper, "ABC");
    assert_eq!(upper.source(), None);
}

#[test]
fn strip_family_preserves_identity_when_nothing_strips() {
    let s = tracked("abc", "f");
    assert_eq!(s.strip(None).source(), Some("f"));

    let padded = tracked("  abc  ", "f");
    let stripped = padded.strip(None);
    assert_eq!(stripped, "abc");
    assert_eq!(stripped.offset(), 2);
    assert_eq!(stripped.column_number(), 3);
}

#[test]
fn remove_prefix_and_suffix() {
    let s = tracked("prefix-body-suffix", "f");
    assert_eq!(s.remove_prefix("prefix-"), "body-suffix");
    assert_eq!(s.remove_prefix("prefix-").offset(), 7);
    assert_eq!(s.remove_suffix("-suffix"), "prefix-body");
    assert_eq!(s.remove_prefix("nope").offset(), 0);
}

#[test]
fn partition_with_count_pads_right() {
    let s = tracked("aXbXc", "f");
    let parts = s.partition("X", 3);
    let texts: Vec<&str> = parts.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["a", "X", "b", "X", "c", "", ""]);
    assert_eq!(parts[2].offset(), 2);
}

#[test]
fn rpartition_with_count_pads_left() {
    let s = tracked("aXbXc", "f");
    let parts = s.rpartition("X", 3);
    let texts: Vec<&str> = parts.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["", "", "a", "X", "b", "X", "c"]);
}

#[test]
fn partition_count_zero_returns_input() {
    let s = tracked("aXb", "f");
    let parts = s.partition("X", 0);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0], "aXb");
}

#[test]
fn split_locates_pieces_in_the_original() {
    let s = tracked("a-b-c", "f");
    let pieces = s.split("-", None).unwrap();
    let texts: Vec<&str> = pieces.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
    assert_eq!(pieces[1].offset(), 2);
    assert_eq!(pieces[2].offset(), 4);
}

#[test]
fn whitespace_split_discards_and_locates() {
    let s = tracked("  a b  c ", "f");
    let pieces = s.split_whitespace_max(None);
    let texts: Vec<&str> = pieces.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
    assert_eq!(pieces[0].offset(), 2);
}

#[test]
fn splitlines_handles_all_breaks() {
    let s = tracked("one\r\ntwo\nthree", "f");
    let lines = s.splitlines(false);
    let texts: Vec<&str> = lines.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(lines[1].line_number(), 2);
    assert_eq!(lines[2].line_number(), 3);

    let kept = s.splitlines(true);
    let rebuilt: Vec<String> = kept.iter().map(|p| p.to_string()).collect();
    assert_eq!(rebuilt.concat(), "one\r\ntwo\nthree");
}

#[test]
fn join_intersperses_the_separator() {
    let sep = SourceString::new(", ");
    let s = tracked("abc", "f");
    let parts = [s.slice(0, 1), s.slice(1, 2), s.slice(2, 3)];
    let joined = sep.join(&parts);
    assert_eq!(joined, "a, b, c");
}

#[test]
fn bisect_splits_at_the_index() {
    let s = tracked("abcdef", "f");
    let (left, right) = s.bisect(2);
    assert_eq!(left, "ab");
    assert_eq!(right, "cdef");
    assert_eq!(right.offset(), 2);
}

#[test]
fn padding_keeps_the_original_text_positioned() {
    let s = tracked("ab", "f");
    let padded = s.ljust(4, '.');
    assert_eq!(padded, "ab..");
    assert_eq!(padded.slice(0, 2).location(), "f line 1 column 1");

    let padded = s.rjust(4, '.');
    assert_eq!(padded, "..ab");
    assert_eq!(padded.slice(2, 4).location(), "f line 1 column 1");

    assert_eq!(s.zfill(4), "00ab");
    assert_eq!(s.center(4, '*'), "*ab*");
}

#[test]
fn split_with_keeps_provenance_through_multisplit() {
    let s = tracked("a-b_c", "f");
    let pieces = s
        .split_with(Separators::List(&["-", "_"]), Keep::Discard, false)
        .unwrap();
    let texts: Vec<&str> = pieces.iter().map(|p| p.as_str()).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
    assert_eq!(pieces[2].offset(), 4);
    assert_eq!(pieces[2].location(), "f line 1 column 5");
}

#[test]
fn slice_round_trip_reconstruction() {
    let s = tracked("abc", "f");
    let rebuilt = &s.slice(0, 0) + &s.slice(0, 3);
    assert_eq!(rebuilt, "abc");
    assert_eq!(rebuilt.source(), Some("f"));
    assert_eq!(rebuilt.line_number(), 1);
}
