//! strand — text splitting, provenance-tracking strings, and
//! cursor-based linked lists.
//!
//! Three subsystems form the core:
//!
//! * A polymorphic splitting engine over `str` and `[u8]`:
//!   [`multisplit`] (the canonical splitter, with keep/separate/strip/
//!   reverse modes), [`multipartition`], [`multistrip`],
//!   [`split_quoted_strings`], [`split_delimiters`], and right-to-left
//!   regex scanning ([`reversed_re_finditer`], [`re_partition`],
//!   [`re_rpartition`]).
//! * [`SourceString`], an immutable string in which every character of
//!   every substring remembers its origin, line, and column — through
//!   slicing, concatenation, splitting, replacement, and partitioning.
//! * [`LinkedList`], a doubly-linked list with first-class [`Cursor`]
//!   iterators, deleted-but-referenced node semantics, and an optional
//!   shareable lock.
//!
//! ```
//! use strand::multisplit;
//!
//! let pieces = multisplit("wx-ab_cd", &["-", "_"]).segments().unwrap();
//! assert_eq!(pieces, vec!["wx", "ab", "cd"]);
//! ```

mod error;
pub mod list;
pub mod source;
pub mod split;
pub mod text;

pub use error::{ListError, SplitError};

pub use split::delimiters::{split_delimiters, Delimiter, SplitDelimiters};
pub use split::multisplit::{
    multipartition, multirpartition, multisplit, multistrip, Keep, Multisplit, Strip,
};
pub use split::quoted::{split_quoted_strings, SplitQuotedStrings};
pub use split::rfinditer::{re_partition, re_rpartition, reversed_matches, reversed_re_finditer};
pub use split::separators::{
    separators_pattern, APOSTROPHES, ASCII_APOSTROPHES, ASCII_DOUBLE_QUOTES, ASCII_LINEBREAKS,
    ASCII_LINEBREAKS_WITHOUT_CRLF, ASCII_WHITESPACE, ASCII_WHITESPACE_WITHOUT_CRLF,
    BYTES_LINEBREAKS, BYTES_LINEBREAKS_WITHOUT_CRLF, BYTES_WHITESPACE,
    BYTES_WHITESPACE_WITHOUT_CRLF, DOUBLE_QUOTES, STR_LINEBREAKS, STR_LINEBREAKS_WITHOUT_CRLF,
    STR_WHITESPACE, STR_WHITESPACE_WITHOUT_CRLF, UNICODE_LINEBREAKS,
    UNICODE_LINEBREAKS_WITHOUT_CRLF, UNICODE_WHITESPACE, UNICODE_WHITESPACE_WITHOUT_CRLF,
};
pub use split::text::{Separators, Text};

pub use source::{SourceError, SourceOptions, SourceString};

pub use list::{Cursor, Direction, LinkedList, ListLock, LockMode};

pub use text::{
    combine_splits, gently_title, int_to_words, lines, lines_containing,
    lines_convert_tabs_to_spaces, lines_filter_comment_lines, lines_filter_empty_lines,
    lines_grep, lines_rstrip, lines_sort, lines_strip, lines_strip_comments, lines_strip_indent,
    merge_columns, normalize_whitespace, split_text_with_code, split_title_case, wrap_words, Clip,
    Line, LineInfo, LineResult, Lines, LinesOptions, MergeOptions, OverflowStrategy,
    SplitTextOptions,
};
