//! Error types for the splitting engine, the text utilities,
//! and the linked list.

use std::fmt;

/// Errors raised by the splitters and text utilities.
///
/// Offsets are code-unit offsets into the input text (byte offsets for
/// `str` and `[u8]` alike).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// The separator collection was empty.
    EmptySeparators,
    /// A separator, quote marker, or delimiter string was empty.
    EmptySeparator,
    /// A quote marker appeared more than once in one quote class.
    RepeatedQuote(String),
    /// A marker appeared in both the single-line and multiline quote classes.
    QuoteInBothClasses(String),
    /// An open delimiter appeared more than once in a delimiter map.
    RepeatedDelimiter(String),
    /// Backslash used as an open or close delimiter, or escape/quoting
    /// flags disagree.
    IllegalDelimiter(String),
    /// The same string is both an opening and a (non-quoting) closing
    /// delimiter.
    OpenAndCloseDelimiter(String),
    /// A resume-state marker wasn't one of the configured markers.
    InvalidState(String),
    /// A single-line quoted section contained a linebreak.
    UnterminatedQuote { offset: usize },
    /// A token that isn't legal in the current delimiter state.
    IllegalToken { offset: usize, token: String },
    /// A newline inside a delimiter that forbids them.
    IllegalNewline { offset: usize, delimiter: String },
    /// The text ended with a dangling escape string.
    TrailingEscape { offset: usize },
    /// A split array handed to `combine_splits` overran the string.
    SplitTooLong,
    /// `wrap_words` was given no words.
    NoWords,
    /// A column line exceeded its maximum width under
    /// `OverflowStrategy::Raise`.
    ColumnOverflow {
        column: usize,
        width: usize,
        limit: usize,
    },
    /// An unindent that doesn't match any outer indentation level.
    IllegalDedent { line: usize, column: usize },
    /// A partition count was negative or otherwise out of domain.
    InvalidCount,
    /// A user-supplied regex pattern failed to compile.
    Pattern(String),
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::EmptySeparators => {
                write!(f, "separators must be a non-empty collection")
            }
            SplitError::EmptySeparator => {
                write!(f, "separators must not contain empty strings")
            }
            SplitError::RepeatedQuote(q) => {
                write!(f, "repeated quote marker: {q:?}")
            }
            SplitError::QuoteInBothClasses(q) => {
                write!(f, "{q:?} appears in both quotes and multiline_quotes")
            }
            SplitError::RepeatedDelimiter(d) => {
                write!(f, "repeated open delimiter: {d:?}")
            }
            SplitError::IllegalDelimiter(d) => {
                write!(f, "illegal delimiter: {d}")
            }
            SplitError::OpenAndCloseDelimiter(d) => {
                write!(f, "{d:?} cannot be both an opening and closing delimiter")
            }
            SplitError::InvalidState(s) => {
                write!(f, "state marker {s:?} is not a configured marker")
            }
            SplitError::UnterminatedQuote { offset } => {
                write!(f, "offset {offset}: unterminated quoted string")
            }
            SplitError::IllegalToken { offset, token } => {
                write!(f, "offset {offset}: illegal string {token:?}")
            }
            SplitError::IllegalNewline { offset, delimiter } => {
                write!(
                    f,
                    "offset {offset}: newline is illegal inside delimiter {delimiter:?}"
                )
            }
            SplitError::TrailingEscape { offset } => {
                write!(f, "offset {offset}: text ends with escape string")
            }
            SplitError::SplitTooLong => {
                write!(f, "split array is longer than the original string")
            }
            SplitError::NoWords => write!(f, "no words to wrap"),
            SplitError::ColumnOverflow {
                column,
                width,
                limit,
            } => {
                write!(
                    f,
                    "overflow in column {column}: line is {width} characters, \
                     column max_width is {limit}"
                )
            }
            SplitError::IllegalDedent { line, column } => {
                write!(
                    f,
                    "line {line} column {column}: unindent doesn't match any \
                     outer indentation level"
                )
            }
            SplitError::InvalidCount => write!(f, "count must be >= 0"),
            SplitError::Pattern(message) => write!(f, "invalid pattern: {message}"),
        }
    }
}

impl std::error::Error for SplitError {}

/// Errors raised by `LinkedList` and `Cursor` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// An index before head or past tail, or indexing a sentinel.
    UndefinedIndex,
    /// The operation landed on a tombstone (a removed node kept alive by
    /// outstanding cursors), or tried to truncate a sentinel.
    SpecialNode,
    /// `find`/`remove` didn't locate the value and no default was given.
    ValueNotFound,
    /// `pop` from an empty list.
    EmptyList,
    /// A cut range whose stop precedes its start.
    InvalidRange,
    /// A cursor that doesn't belong to the list being operated on.
    ForeignCursor,
    /// Forward and reverse cursors mixed in a single range.
    MismatchedDirections,
    /// An operation that would make a list operate on itself
    /// (extend with self, splice into self).
    SelfOperation,
    /// Extended-slice assignment with the wrong number of values.
    SizeMismatch { expected: usize, got: usize },
    /// The cursor's list no longer exists.
    ListDropped,
    /// A slice step of zero.
    ZeroStep,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::UndefinedIndex => write!(f, "linked list index out of range"),
            ListError::SpecialNode => {
                write!(f, "special nodes don't support this operation")
            }
            ListError::ValueNotFound => write!(f, "value not found in linked list"),
            ListError::EmptyList => write!(f, "pop from empty linked list"),
            ListError::InvalidRange => write!(f, "stop points to a node before start"),
            ListError::ForeignCursor => {
                write!(f, "cursor is not an iterator over this linked list")
            }
            ListError::MismatchedDirections => {
                write!(f, "mismatched forward and reverse cursors")
            }
            ListError::SelfOperation => write!(f, "list can't operate on itself"),
            ListError::SizeMismatch { expected, got } => {
                write!(
                    f,
                    "attempt to assign sequence of size {got} to extended \
                     slice of size {expected}"
                )
            }
            ListError::ListDropped => {
                write!(f, "the cursor's linked list no longer exists")
            }
            ListError::ZeroStep => write!(f, "slice step cannot be zero"),
        }
    }
}

impl std::error::Error for ListError {}
