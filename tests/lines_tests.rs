//! Lines iterator and modifier chain tests.

use strand::{
    lines, lines_containing, lines_convert_tabs_to_spaces, lines_filter_comment_lines,
    lines_filter_empty_lines, lines_grep, lines_rstrip, lines_sort, lines_strip,
    lines_strip_comments, lines_strip_indent, Line, LineResult, LinesOptions, SplitError,
};

fn collect(iter: impl Iterator<Item = LineResult>) -> Vec<Line> {
    iter.collect::<Result<Vec<Line>, SplitError>>().unwrap()
}

fn texts(lines: &[Line]) -> Vec<&str> {
    lines.iter().map(|(_, line)| line.as_str()).collect()
}

#[test]
fn lines_yield_numbered_pairs() {
    let collected = collect(lines("a\nb\r\nc", LinesOptions::default()).unwrap());
    assert_eq!(texts(&collected), vec!["a", "b", "c"]);
    let numbers: Vec<usize> = collected.iter().map(|(info, _)| info.line_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(collected[0].0.end, "\n");
    assert_eq!(collected[1].0.end, "\r\n");
    assert_eq!(collected[2].0.end, "");
}

#[test]
fn raw_line_includes_its_terminator() {
    let collected = collect(lines("a\nb", LinesOptions::default()).unwrap());
    assert_eq!(collected[0].0.line, "a\n");
    assert_eq!(collected[1].0.line, "b");
}

#[test]
fn trailing_newline_yields_a_final_empty_line() {
    let collected = collect(lines("a\n", LinesOptions::default()).unwrap());
    assert_eq!(texts(&collected), vec!["a", ""]);
}

#[test]
fn rstrip_clips_into_trailing() {
    let collected = collect(lines_rstrip(
        lines("a  \nb\t\n", LinesOptions::default()).unwrap(),
        None,
    ));
    assert_eq!(texts(&collected), vec!["a", "b", ""]);
    assert_eq!(collected[0].0.trailing, "  ");
    assert_eq!(collected[1].0.trailing, "\t");
}

#[test]
fn strip_clips_both_sides_and_updates_columns() {
    let collected = collect(lines_strip(
        lines("  ab  ", LinesOptions::default()).unwrap(),
        None,
    ));
    assert_eq!(texts(&collected), vec!["ab"]);
    assert_eq!(collected[0].0.leading, "  ");
    assert_eq!(collected[0].0.trailing, "  ");
    assert_eq!(collected[0].0.column_number, 3);
}

#[test]
fn strip_all_whitespace_line_clips_to_trailing() {
    let collected = collect(lines_strip(
        lines("   ", LinesOptions::default()).unwrap(),
        None,
    ));
    assert_eq!(texts(&collected), vec![""]);
    assert_eq!(collected[0].0.trailing, "   ");
    assert_eq!(collected[0].0.column_number, 1);
}

#[test]
fn filter_comment_lines_drops_whole_lines() {
    let text = "keep\n# comment\n  ## also comment\nalso keep";
    let collected = collect(
        lines_filter_comment_lines(lines(text, LinesOptions::default()).unwrap(), &["#"]).unwrap(),
    );
    assert_eq!(texts(&collected), vec!["keep", "also keep"]);
}

#[test]
fn containing_filters_by_substring() {
    let text = "alpha\nbeta\ngamma";
    let collected = collect(lines_containing(
        lines(text, LinesOptions::default()).unwrap(),
        "a".to_string(),
        false,
    ));
    assert_eq!(texts(&collected), vec!["alpha", "beta", "gamma"]);
    let collected = collect(lines_containing(
        lines(text, LinesOptions::default()).unwrap(),
        "mm".to_string(),
        true,
    ));
    assert_eq!(texts(&collected), vec!["alpha", "beta"]);
}

#[test]
fn grep_records_the_match_span() {
    let text = "one 1\ntwo\nthree 3";
    let collected = collect(
        lines_grep(
            lines(text, LinesOptions::default()).unwrap(),
            "[0-9]",
            false,
        )
        .unwrap(),
    );
    assert_eq!(texts(&collected), vec!["one 1", "three 3"]);
    assert_eq!(collected[0].0.match_span, Some((4, 5)));

    let inverted = collect(
        lines_grep(lines(text, LinesOptions::default()).unwrap(), "[0-9]", true).unwrap(),
    );
    assert_eq!(texts(&inverted), vec!["two"]);
    assert_eq!(inverted[0].0.match_span, None);
}

#[test]
fn sort_orders_lines() {
    let collected = collect(lines_sort(
        lines("b\na\nc", LinesOptions::default()).unwrap(),
        false,
    ));
    assert_eq!(texts(&collected), vec!["a", "b", "c"]);
    // Line numbers travel with their lines.
    assert_eq!(collected[0].0.line_number, 2);
}

#[test]
fn convert_tabs_uses_the_stream_tab_width() {
    let collected = collect(lines_convert_tabs_to_spaces(
        lines(
            "\ta",
            LinesOptions {
                tab_width: 4,
                ..LinesOptions::default()
            },
        )
        .unwrap(),
    ));
    assert_eq!(texts(&collected), vec!["    a"]);
}

#[test]
fn filter_empty_preserves_line_numbers() {
    let collected = collect(lines_filter_empty_lines(
        lines("\n\n\na\n\nb", LinesOptions::default()).unwrap(),
    ));
    assert_eq!(texts(&collected), vec!["a", "b"]);
    let numbers: Vec<usize> = collected.iter().map(|(info, _)| info.line_number).collect();
    assert_eq!(numbers, vec![4, 6]);
}

#[test]
fn strip_comments_truncates_at_the_marker() {
    let text = "code # comment\nplain line";
    let collected = collect(
        lines_strip_comments(
            lines(text, LinesOptions::default()).unwrap(),
            &["#"],
            &[],
            &[],
            "\\",
        )
        .unwrap(),
    );
    assert_eq!(texts(&collected), vec!["code ", "plain line"]);
    assert_eq!(collected[0].0.trailing, "# comment");
}

#[test]
fn strip_comments_ignores_markers_inside_quotes() {
    let text = r##"x = "#not a comment" # real"##;
    let collected = collect(
        lines_strip_comments(
            lines(text, LinesOptions::default()).unwrap(),
            &["#"],
            &["\"", "'"],
            &[],
            "\\",
        )
        .unwrap(),
    );
    assert_eq!(texts(&collected), vec![r##"x = "#not a comment" "##]);
}

#[test]
fn strip_comments_unterminated_single_line_quote_errors() {
    let text = "x = \"broken # no\nnext";
    let result: Result<Vec<Line>, SplitError> = lines_strip_comments(
        lines(text, LinesOptions::default()).unwrap(),
        &["#"],
        &["\""],
        &[],
        "\\",
    )
    .unwrap()
    .collect();
    assert!(matches!(
        result,
        Err(SplitError::UnterminatedQuote { .. })
    ));
}

#[test]
fn strip_comments_multiline_quotes_cross_lines() {
    let text = "a = `start # not\nstill quoted # not` b # yes\nend";
    let collected = collect(
        lines_strip_comments(
            lines(text, LinesOptions::default()).unwrap(),
            &["#"],
            &[],
            &["`"],
            "\\",
        )
        .unwrap(),
    );
    assert_eq!(
        texts(&collected),
        vec!["a = `start # not", "still quoted # not` b ", "end"]
    );
}

#[test]
fn strip_indent_tracks_levels() {
    let text = "top\n    one\n        two\n    one again\ntop again";
    let collected = collect(lines_strip_indent(
        lines(text, LinesOptions::default()).unwrap(),
    ));
    let indents: Vec<usize> = collected.iter().map(|(info, _)| info.indent).collect();
    assert_eq!(indents, vec![0, 1, 2, 1, 0]);
    assert_eq!(
        texts(&collected),
        vec!["top", "one", "two", "one again", "top again"]
    );
    assert_eq!(collected[1].0.column_number, 5);
}

#[test]
fn strip_indent_rejects_unmatched_dedent() {
    let text = "top\n        deep\n    nowhere";
    let result: Result<Vec<Line>, SplitError> =
        lines_strip_indent(lines(text, LinesOptions::default()).unwrap()).collect();
    assert!(matches!(result, Err(SplitError::IllegalDedent { .. })));
}

#[test]
fn strip_indent_blank_lines_take_the_next_indent() {
    let text = "top\n\n    indented\n\n";
    let collected = collect(lines_strip_indent(
        lines(text, LinesOptions::default()).unwrap(),
    ));
    let indents: Vec<usize> = collected.iter().map(|(info, _)| info.indent).collect();
    // The blank line before "indented" gets its indent; trailing blanks
    // get zero.
    assert_eq!(indents, vec![0, 1, 1, 0, 0]);
}

#[test]
fn modifiers_compose() {
    let text = "# header\n  alpha  \n\n  beta # trailing\n";
    let stream = lines(text, LinesOptions::default()).unwrap();
    let stream = lines_filter_comment_lines(stream, &["#"]).unwrap();
    let stream = lines_strip_comments(stream, &["#"], &[], &[], "\\");
    let stream = lines_strip(stream.unwrap(), None);
    let stream = lines_filter_empty_lines(stream);
    let collected = collect(stream);
    assert_eq!(texts(&collected), vec!["alpha", "beta"]);
}
