//! Quoted-string splitting: quote classes, escapes, resumable state.

use strand::{split_quoted_strings, SplitError};

type Triple = (String, String, String);

fn rejoin(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
        .collect()
}

#[test]
fn splits_quoted_and_unquoted_segments() {
    let input = r#"load "file.txt" as 'data'"#;
    let triples = split_quoted_strings(input).triples().unwrap();
    assert_eq!(
        triples,
        vec![
            ("".to_string(), "load ".to_string(), "".to_string()),
            ("\"".to_string(), "file.txt".to_string(), "\"".to_string()),
            ("".to_string(), " as ".to_string(), "".to_string()),
            ("'".to_string(), "data".to_string(), "'".to_string()),
        ]
    );
    assert_eq!(rejoin(&triples), input);
}

#[test]
fn empty_input_yields_one_empty_triple() {
    let triples = split_quoted_strings("").triples().unwrap();
    assert_eq!(
        triples,
        vec![("".to_string(), "".to_string(), "".to_string())]
    );
}

#[test]
fn escape_keeps_quote_open_and_stays_in_body() {
    let input = r#""a\"b" c"#;
    let triples = split_quoted_strings(input).triples().unwrap();
    assert_eq!(
        triples,
        vec![
            ("\"".to_string(), "a\\\"b".to_string(), "\"".to_string()),
            ("".to_string(), " c".to_string(), "".to_string()),
        ]
    );
    assert_eq!(rejoin(&triples), input);
}

#[test]
fn escaped_escape_does_not_eat_the_closing_quote() {
    let input = r#""a\\""#;
    let triples = split_quoted_strings(input).triples().unwrap();
    assert_eq!(
        triples,
        vec![("\"".to_string(), "a\\\\".to_string(), "\"".to_string())]
    );
}

#[test]
fn quote_marker_of_other_kind_is_literal_inside_quote() {
    let triples = split_quoted_strings(r#""it's""#).triples().unwrap();
    assert_eq!(
        triples,
        vec![("\"".to_string(), "it's".to_string(), "\"".to_string())]
    );
}

#[test]
fn unterminated_quote_yields_empty_trailing_marker() {
    let triples = split_quoted_strings("a 'bc").triples().unwrap();
    assert_eq!(
        triples,
        vec![
            ("".to_string(), "a ".to_string(), "".to_string()),
            ("'".to_string(), "bc".to_string(), "".to_string()),
        ]
    );
}

#[test]
fn resumed_state_closes_with_empty_leading_quote() {
    let triples = split_quoted_strings("a b c'")
        .state("'")
        .triples()
        .unwrap();
    assert_eq!(
        triples,
        vec![("".to_string(), "a b c".to_string(), "'".to_string())]
    );
}

#[test]
fn state_must_name_a_configured_marker() {
    let err = split_quoted_strings("abc").state("%").triples().unwrap_err();
    assert!(matches!(err, SplitError::InvalidState(_)));
}

#[test]
fn linebreak_inside_single_line_quote_is_an_error() {
    let err = split_quoted_strings("'a\nb'").triples().unwrap_err();
    assert!(matches!(err, SplitError::UnterminatedQuote { .. }));
}

#[test]
fn multiline_quotes_span_linebreaks() {
    let quotes: &[&str] = &["'''"];
    let triples = split_quoted_strings("'''a\nb''' rest")
        .multiline_quotes(quotes)
        .quotes(&[])
        .triples()
        .unwrap();
    assert_eq!(
        triples,
        vec![
            ("'''".to_string(), "a\nb".to_string(), "'''".to_string()),
            ("".to_string(), " rest".to_string(), "".to_string()),
        ]
    );
}

#[test]
fn marker_in_both_classes_is_rejected() {
    let both: &[&str] = &["'"];
    let err = split_quoted_strings("x")
        .quotes(both)
        .multiline_quotes(both)
        .triples()
        .unwrap_err();
    assert!(matches!(err, SplitError::QuoteInBothClasses(_)));
}

#[test]
fn repeated_marker_is_rejected() {
    let repeated: &[&str] = &["'", "'"];
    let err = split_quoted_strings("x").quotes(repeated).triples().unwrap_err();
    assert!(matches!(err, SplitError::RepeatedQuote(_)));
}

#[test]
fn multi_character_quote_markers_work() {
    let quotes: &[&str] = &["<<", ">>"];
    let triples = split_quoted_strings("a <<b c<< d")
        .quotes(quotes)
        .triples()
        .unwrap();
    assert_eq!(
        triples,
        vec![
            ("".to_string(), "a ".to_string(), "".to_string()),
            ("<<".to_string(), "b c".to_string(), "<<".to_string()),
            ("".to_string(), " d".to_string(), "".to_string()),
        ]
    );
}

#[test]
fn bytes_variant_splits_quotes_too() {
    let triples = split_quoted_strings(b"a 'b' c".as_slice()).triples().unwrap();
    assert_eq!(
        triples,
        vec![
            (b"".to_vec(), b"a ".to_vec(), b"".to_vec()),
            (b"'".to_vec(), b"b".to_vec(), b"'".to_vec()),
            (b"".to_vec(), b" c".to_vec(), b"".to_vec()),
        ]
    );
}
