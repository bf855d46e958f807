//! Text utilities: word wrapping, column merging, the lines iterator
//! protocol, and assorted helpers.

pub mod lines;
pub mod misc;
pub mod wrap;

pub use lines::{
    lines, lines_containing, lines_convert_tabs_to_spaces, lines_filter_comment_lines,
    lines_filter_empty_lines, lines_grep, lines_rstrip, lines_sort, lines_strip,
    lines_strip_comments, lines_strip_indent, Clip, Line, LineInfo, LineResult, Lines,
    LinesOptions,
};
pub use misc::{combine_splits, gently_title, int_to_words, normalize_whitespace, split_title_case};
pub use wrap::{
    merge_columns, split_text_with_code, wrap_words, MergeOptions, OverflowStrategy,
    SplitTextOptions,
};
