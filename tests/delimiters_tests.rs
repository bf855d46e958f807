//! Nested delimiter parsing: default sets, custom sets, quoting,
//! resplit overlap handling, and error offsets.

use strand::{split_delimiters, Delimiter, SplitError};

type Triple = (String, String, String);

fn triple(body: &str, open: &str, close: &str) -> Triple {
    (body.to_string(), open.to_string(), close.to_string())
}

fn rejoin(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|(body, open, close)| format!("{body}{open}{close}"))
        .collect()
}

#[test]
fn nested_structure_scenario() {
    let triples = split_delimiters("a(b[c]d)e").triples().unwrap();
    assert_eq!(
        triples,
        vec![
            triple("a", "(", ""),
            triple("b", "[", ""),
            triple("c", "", "]"),
            triple("d", "", ")"),
            triple("e", "", ""),
        ]
    );
    assert_eq!(rejoin(&triples), "a(b[c]d)e");
}

#[test]
fn at_most_one_of_open_close_is_set() {
    let triples = split_delimiters("x{y(z)}").triples().unwrap();
    for (_, open, close) in &triples {
        assert!(open.is_empty() || close.is_empty());
    }
    assert_eq!(rejoin(&triples), "x{y(z)}");
}

#[test]
fn quoting_delimiters_hide_other_markers() {
    let triples = split_delimiters(r#"a"([{"b"#).triples().unwrap();
    assert_eq!(
        triples,
        vec![
            triple("a", "\"", ""),
            triple("([{", "", "\""),
            triple("b", "", ""),
        ]
    );
}

#[test]
fn escape_inside_quote_protects_the_close_marker() {
    let triples = split_delimiters(r#""a\"b""#).triples().unwrap();
    assert_eq!(
        triples,
        vec![triple("", "\"", ""), triple("a\\\"b", "", "\"")]
    );
}

#[test]
fn unterminated_delimiters_are_not_an_error() {
    let triples = split_delimiters("a(b[c").triples().unwrap();
    assert_eq!(
        triples,
        vec![triple("a", "(", ""), triple("b", "[", ""), triple("c", "", "")]
    );
}

#[test]
fn unbalanced_close_is_illegal_with_offset() {
    let err = split_delimiters("ab)").triples().unwrap_err();
    assert_eq!(
        err,
        SplitError::IllegalToken {
            offset: 2,
            token: format!("{:?}", b")".to_vec()),
        }
    );
}

#[test]
fn mismatched_close_is_illegal() {
    let err = split_delimiters("(a]").triples().unwrap_err();
    assert!(matches!(err, SplitError::IllegalToken { offset: 2, .. }));
}

#[test]
fn newline_inside_single_line_quote_is_illegal() {
    let err = split_delimiters("'a\nb'").triples().unwrap_err();
    assert!(matches!(err, SplitError::IllegalNewline { offset: 2, .. }));
}

#[test]
fn newline_outside_quotes_is_fine() {
    let triples = split_delimiters("a\n(b)\nc").triples().unwrap();
    assert_eq!(rejoin(&triples), "a\n(b)\nc");
}

#[test]
fn trailing_escape_is_an_error() {
    let err = split_delimiters("'ab\\").triples().unwrap_err();
    assert!(matches!(err, SplitError::TrailingEscape { .. }));
}

#[test]
fn primed_state_continues_an_open_structure() {
    let triples = split_delimiters("c]d").state(&["["]).triples().unwrap();
    assert_eq!(triples, vec![triple("c", "", "]"), triple("d", "", "")]);
}

#[test]
fn primed_state_rejects_unknown_markers() {
    let err = split_delimiters("x").state(&["%"]).triples().unwrap_err();
    assert!(matches!(err, SplitError::InvalidState(_)));
}

#[test]
fn custom_delimiters_with_multi_character_markers() {
    let begin_end: &[(&str, Delimiter<str>)] = &[
        ("begin ", Delimiter::nesting("end").unwrap()),
        ("(", Delimiter::nesting(")").unwrap()),
    ];
    let triples = split_delimiters("a begin b(c)end d")
        .delimiters(begin_end)
        .triples()
        .unwrap();
    assert_eq!(
        triples,
        vec![
            triple("a ", "begin ", ""),
            triple("b", "(", ""),
            triple("c", "", ")"),
            triple("", "", "end"),
            triple(" d", "", ""),
        ]
    );
}

#[test]
fn overlapping_token_truncates_to_the_current_close() {
    // `)>` is a token of the `<` delimiter, but inside `(` it begins
    // with the paren's close marker: act as if `)` was received and
    // rescan from the `>`.
    let delimiters: &[(&str, Delimiter<str>)] = &[
        ("(", Delimiter::nesting(")").unwrap()),
        ("<", Delimiter::nesting(")>").unwrap()),
    ];
    let triples = split_delimiters("(a)>")
        .delimiters(delimiters)
        .triples()
        .unwrap();
    assert_eq!(
        triples,
        vec![
            triple("", "(", ""),
            triple("a", "", ")"),
            triple(">", "", ""),
        ]
    );
    assert_eq!(rejoin(&triples), "(a)>");
}

#[test]
fn quoting_state_flushes_one_unit_and_rescans() {
    // Inside the double quote, `>">` is not one of the quote's markers,
    // but it buries a real close marker: flush one unit and rescan.
    let delimiters: &[(&str, Delimiter<str>)] = &[
        ("\"", Delimiter::quoting("\"", "\\", true).unwrap()),
        ("<\"<", Delimiter::nesting(">\">").unwrap()),
    ];
    let triples = split_delimiters(r#"a"b>">c"#)
        .delimiters(delimiters)
        .triples()
        .unwrap();
    assert_eq!(
        triples,
        vec![
            triple("a", "\"", ""),
            triple("b>", "", "\""),
            triple(">c", "", ""),
        ]
    );
    assert_eq!(rejoin(&triples), r#"a"b>">c"#);
}

#[test]
fn backslash_delimiters_are_rejected() {
    assert!(Delimiter::<str>::nesting("\\").is_err());
    let bad: &[(&str, Delimiter<str>)] = &[("\\", Delimiter::nesting(")").unwrap())];
    let err = split_delimiters("x").delimiters(bad).triples().unwrap_err();
    assert!(matches!(err, SplitError::IllegalDelimiter(_)));
}

#[test]
fn quoting_requires_an_escape() {
    assert!(Delimiter::<str>::quoting("'", "", false).is_err());
    assert!(Delimiter::<str>::quoting("'", "\\", false).is_ok());
}

#[test]
fn open_marker_reused_as_nesting_close_is_rejected() {
    let bad: &[(&str, Delimiter<str>)] = &[
        ("(", Delimiter::nesting(")").unwrap()),
        (")", Delimiter::nesting("(").unwrap()),
    ];
    let err = split_delimiters("x").delimiters(bad).triples().unwrap_err();
    assert!(matches!(err, SplitError::OpenAndCloseDelimiter(_)));
}

#[test]
fn bytes_variant_parses_delimiters_too() {
    let triples = split_delimiters(b"a(b)c".as_slice()).triples().unwrap();
    assert_eq!(
        triples,
        vec![
            (b"a".to_vec(), b"(".to_vec(), b"".to_vec()),
            (b"b".to_vec(), b"".to_vec(), b")".to_vec()),
            (b"c".to_vec(), b"".to_vec(), b"".to_vec()),
        ]
    );
}
