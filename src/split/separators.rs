//! Separator tables and the memoized separator-to-pattern compiler.
//!
//! Every splitter funnels its separator set through [`compiled`]: the set
//! is sorted longest-first (the regex `|` operator is leftmost-wins, so
//! longer forms must come first to get greedy semantics), quoted, joined
//! into an alternation, and compiled once per distinct
//! (separators, variant, separate, keep) combination.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::split::text::Text;

/// Whitespace as Python's `str` understands it: Unicode whitespace
/// plus the four ASCII separator control characters, plus the CR-LF
/// sequence as a single separator.
pub static STR_WHITESPACE: &[&str] = &[
    "\t", "\n", "\x0b", "\x0c", "\r", "\r\n", "\x1c", "\x1d", "\x1e", "\x1f", " ", "\u{85}",
    "\u{a0}", "\u{1680}", "\u{2000}", "\u{2001}", "\u{2002}", "\u{2003}", "\u{2004}", "\u{2005}",
    "\u{2006}", "\u{2007}", "\u{2008}", "\u{2009}", "\u{200a}", "\u{2028}", "\u{2029}", "\u{202f}",
    "\u{205f}", "\u{3000}",
];

pub static STR_WHITESPACE_WITHOUT_CRLF: &[&str] = &[
    "\t", "\n", "\x0b", "\x0c", "\r", "\x1c", "\x1d", "\x1e", "\x1f", " ", "\u{85}", "\u{a0}",
    "\u{1680}", "\u{2000}", "\u{2001}", "\u{2002}", "\u{2003}", "\u{2004}", "\u{2005}", "\u{2006}",
    "\u{2007}", "\u{2008}", "\u{2009}", "\u{200a}", "\u{2028}", "\u{2029}", "\u{202f}", "\u{205f}",
    "\u{3000}",
];

/// Whitespace as defined by Unicode: the table above without the four
/// ASCII separator control characters.
pub static UNICODE_WHITESPACE: &[&str] = &[
    "\t", "\n", "\x0b", "\x0c", "\r", "\r\n", " ", "\u{85}", "\u{a0}", "\u{1680}", "\u{2000}",
    "\u{2001}", "\u{2002}", "\u{2003}", "\u{2004}", "\u{2005}", "\u{2006}", "\u{2007}", "\u{2008}",
    "\u{2009}", "\u{200a}", "\u{2028}", "\u{2029}", "\u{202f}", "\u{205f}", "\u{3000}",
];

pub static UNICODE_WHITESPACE_WITHOUT_CRLF: &[&str] = &[
    "\t", "\n", "\x0b", "\x0c", "\r", " ", "\u{85}", "\u{a0}", "\u{1680}", "\u{2000}", "\u{2001}",
    "\u{2002}", "\u{2003}", "\u{2004}", "\u{2005}", "\u{2006}", "\u{2007}", "\u{2008}", "\u{2009}",
    "\u{200a}", "\u{2028}", "\u{2029}", "\u{202f}", "\u{205f}", "\u{3000}",
];

/// Unicode whitespace restricted to the first 128 code points.
pub static ASCII_WHITESPACE: &[&str] = &["\t", "\n", "\x0b", "\x0c", "\r", "\r\n", " "];

pub static ASCII_WHITESPACE_WITHOUT_CRLF: &[&str] = &["\t", "\n", "\x0b", "\x0c", "\r", " "];

pub static BYTES_WHITESPACE: &[&[u8]] = &[b"\t", b"\n", b"\x0b", b"\x0c", b"\r", b"\r\n", b" "];

pub static BYTES_WHITESPACE_WITHOUT_CRLF: &[&[u8]] =
    &[b"\t", b"\n", b"\x0b", b"\x0c", b"\r", b" "];

/// Linebreaks as Python's `str.splitlines` understands them, with
/// CR-LF as a single break.
pub static STR_LINEBREAKS: &[&str] = &[
    "\n", "\x0b", "\x0c", "\r", "\r\n", "\x1c", "\x1d", "\x1e", "\u{85}", "\u{2028}", "\u{2029}",
];

pub static STR_LINEBREAKS_WITHOUT_CRLF: &[&str] = &[
    "\n", "\x0b", "\x0c", "\r", "\x1c", "\x1d", "\x1e", "\u{85}", "\u{2028}", "\u{2029}",
];

pub static UNICODE_LINEBREAKS: &[&str] = &[
    "\n", "\x0b", "\x0c", "\r", "\r\n", "\u{85}", "\u{2028}", "\u{2029}",
];

pub static UNICODE_LINEBREAKS_WITHOUT_CRLF: &[&str] =
    &["\n", "\x0b", "\x0c", "\r", "\u{85}", "\u{2028}", "\u{2029}"];

pub static ASCII_LINEBREAKS: &[&str] = &["\n", "\x0b", "\x0c", "\r", "\r\n"];

pub static ASCII_LINEBREAKS_WITHOUT_CRLF: &[&str] = &["\n", "\x0b", "\x0c", "\r"];

/// Byte-string linebreaks. Note the absence of `\x0b` and `\x0c`: byte
/// strings don't treat vertical tab or form feed as linebreaks.
pub static BYTES_LINEBREAKS: &[&[u8]] = &[b"\n", b"\r", b"\r\n"];

pub static BYTES_LINEBREAKS_WITHOUT_CRLF: &[&[u8]] = &[b"\n", b"\r"];

/// Every Unicode code point that represents an apostrophe. The back-tick
/// is deliberately absent: it's a diacritical, not a separator.
pub static APOSTROPHES: &str = "'\u{2018}\u{2019}\u{201a}\u{201b}";

/// Every Unicode code point that represents a double quote.
pub static DOUBLE_QUOTES: &str = "\"\u{201c}\u{201d}\u{201e}\u{201f}\u{ab}\u{bb}\u{2039}\u{203a}";

pub static ASCII_APOSTROPHES: &str = "'";

pub static ASCII_DOUBLE_QUOTES: &str = "\"";

// Reversed forms of the standard tables, used when `reverse=true` so the
// reversal step can be skipped. Reversing any single-unit separator is a
// no-op; the only multi-unit entry is CR-LF, which reverses to LF-CR.

static STR_WHITESPACE_REVERSED: &[&str] = &[
    "\t", "\n", "\x0b", "\x0c", "\r", "\x1c", "\x1d", "\x1e", "\x1f", " ", "\u{85}", "\u{a0}",
    "\u{1680}", "\u{2000}", "\u{2001}", "\u{2002}", "\u{2003}", "\u{2004}", "\u{2005}", "\u{2006}",
    "\u{2007}", "\u{2008}", "\u{2009}", "\u{200a}", "\u{2028}", "\u{2029}", "\u{202f}", "\u{205f}",
    "\u{3000}", "\n\r",
];

static UNICODE_WHITESPACE_REVERSED: &[&str] = &[
    "\t", "\n", "\x0b", "\x0c", "\r", " ", "\u{85}", "\u{a0}", "\u{1680}", "\u{2000}", "\u{2001}",
    "\u{2002}", "\u{2003}", "\u{2004}", "\u{2005}", "\u{2006}", "\u{2007}", "\u{2008}", "\u{2009}",
    "\u{200a}", "\u{2028}", "\u{2029}", "\u{202f}", "\u{205f}", "\u{3000}", "\n\r",
];

static ASCII_WHITESPACE_REVERSED: &[&str] = &["\t", "\n", "\x0b", "\x0c", "\r", " ", "\n\r"];

static STR_LINEBREAKS_REVERSED: &[&str] = &[
    "\n", "\x0b", "\x0c", "\r", "\x1c", "\x1d", "\x1e", "\u{85}", "\u{2028}", "\u{2029}", "\n\r",
];

static UNICODE_LINEBREAKS_REVERSED: &[&str] =
    &["\n", "\x0b", "\x0c", "\r", "\u{85}", "\u{2028}", "\u{2029}", "\n\r"];

static ASCII_LINEBREAKS_REVERSED: &[&str] = &["\n", "\x0b", "\x0c", "\r", "\n\r"];

static BYTES_WHITESPACE_REVERSED: &[&[u8]] =
    &[b"\t", b"\n", b"\x0b", b"\x0c", b"\r", b" ", b"\n\r"];

static BYTES_LINEBREAKS_REVERSED: &[&[u8]] = &[b"\n", b"\r", b"\n\r"];

fn same_table<U>(a: &[U], b: &[U]) -> bool {
    a.as_ptr() as usize == b.as_ptr() as usize && a.len() == b.len()
}

pub(crate) fn reversed_standard_str(seps: &[&str]) -> Option<&'static [&'static str]> {
    let pairs: &[(&[&str], &'static [&'static str])] = &[
        (STR_WHITESPACE, STR_WHITESPACE_REVERSED),
        (STR_WHITESPACE_WITHOUT_CRLF, STR_WHITESPACE_WITHOUT_CRLF),
        (UNICODE_WHITESPACE, UNICODE_WHITESPACE_REVERSED),
        (UNICODE_WHITESPACE_WITHOUT_CRLF, UNICODE_WHITESPACE_WITHOUT_CRLF),
        (ASCII_WHITESPACE, ASCII_WHITESPACE_REVERSED),
        (ASCII_WHITESPACE_WITHOUT_CRLF, ASCII_WHITESPACE_WITHOUT_CRLF),
        (STR_LINEBREAKS, STR_LINEBREAKS_REVERSED),
        (STR_LINEBREAKS_WITHOUT_CRLF, STR_LINEBREAKS_WITHOUT_CRLF),
        (UNICODE_LINEBREAKS, UNICODE_LINEBREAKS_REVERSED),
        (UNICODE_LINEBREAKS_WITHOUT_CRLF, UNICODE_LINEBREAKS_WITHOUT_CRLF),
        (ASCII_LINEBREAKS, ASCII_LINEBREAKS_REVERSED),
        (ASCII_LINEBREAKS_WITHOUT_CRLF, ASCII_LINEBREAKS_WITHOUT_CRLF),
    ];
    pairs
        .iter()
        .find(|(table, _)| same_table(seps, table))
        .map(|(_, reversed)| *reversed)
}

pub(crate) fn reversed_standard_bytes(seps: &[&[u8]]) -> Option<&'static [&'static [u8]]> {
    let pairs: &[(&[&[u8]], &'static [&'static [u8]])] = &[
        (BYTES_WHITESPACE, BYTES_WHITESPACE_REVERSED),
        (BYTES_WHITESPACE_WITHOUT_CRLF, BYTES_WHITESPACE_WITHOUT_CRLF),
        (BYTES_LINEBREAKS, BYTES_LINEBREAKS_REVERSED),
        (BYTES_LINEBREAKS_WITHOUT_CRLF, BYTES_LINEBREAKS_WITHOUT_CRLF),
    ];
    pairs
        .iter()
        .find(|(table, _)| same_table(seps, table))
        .map(|(_, reversed)| *reversed)
}

/// True for the code points the `str` linebreak table recognizes.
pub(crate) fn is_str_linebreak_char(c: char) -> bool {
    matches!(
        c,
        '\n' | '\x0b' | '\x0c' | '\r' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// The same bound Python's `re` module uses for its pattern cache.
const PATTERN_CACHE_CAPACITY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PatternKey {
    seps: Vec<Vec<u8>>,
    separate: bool,
    keep: bool,
}

/// Process-wide memo cache for compiled separator alternations. Safe for
/// concurrent readers with single-writer insertion; evicted wholesale at
/// capacity.
pub struct PatternCache<R: 'static> {
    map: Mutex<HashMap<PatternKey, Arc<R>>>,
}

impl<R> PatternCache<R> {
    fn new() -> Self {
        PatternCache {
            map: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_compile(
        &self,
        key: PatternKey,
        compile: impl FnOnce() -> Result<R, regex::Error>,
    ) -> Result<Arc<R>, regex::Error> {
        let mut map = self.map.lock();
        if let Some(found) = map.get(&key) {
            return Ok(Arc::clone(found));
        }
        let compiled = Arc::new(compile()?);
        if map.len() >= PATTERN_CACHE_CAPACITY {
            map.clear();
        }
        map.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }
}

static STR_PATTERNS: Lazy<PatternCache<regex::Regex>> = Lazy::new(PatternCache::new);
static BYTES_PATTERNS: Lazy<PatternCache<regex::bytes::Regex>> = Lazy::new(PatternCache::new);

pub(crate) fn str_pattern_cache() -> &'static PatternCache<regex::Regex> {
    &STR_PATTERNS
}

pub(crate) fn bytes_pattern_cache() -> &'static PatternCache<regex::bytes::Regex> {
    &BYTES_PATTERNS
}

/// Build the alternation pattern source for a separator set.
///
/// `separate=false` matches one-or-more adjacent separators as a single
/// match; `separate=true` matches exactly one. `keep=true` makes the
/// outermost group capturing.
pub fn separators_pattern<T: Text + ?Sized>(
    separators: &[T::Owned],
    separate: bool,
    keep: bool,
) -> String {
    let mut sorted: Vec<&T> = separators.iter().map(Borrow::borrow).collect();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let mut pattern = String::new();
    for (i, sep) in sorted.iter().enumerate() {
        if i > 0 {
            pattern.push('|');
        }
        sep.quote_into(&mut pattern);
    }
    if !separate {
        pattern = format!("(?:{pattern})+");
    }
    if keep {
        pattern = format!("({pattern})");
    }
    pattern
}

/// Compile a separator set, memoized by contents, variant, and flags.
pub(crate) fn compiled<T: Text + ?Sized>(
    separators: &[T::Owned],
    separate: bool,
    keep: bool,
) -> Arc<T::Regex> {
    let key = PatternKey {
        seps: separators.iter().map(|s| s.borrow().key_bytes()).collect(),
        separate,
        keep,
    };
    T::pattern_cache()
        .get_or_compile(key, || {
            let pattern = separators_pattern::<T>(separators, separate, keep);
            T::compile(&pattern)
        })
        .expect("separator alternations always compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_separator_sorts_first() {
        let seps: Vec<String> = vec!["a".into(), "abc".into(), "ab".into()];
        let pattern = separators_pattern::<str>(&seps, true, false);
        assert_eq!(pattern, "abc|ab|a");
    }

    #[test]
    fn whitespace_atoms_stay_verbatim() {
        let seps: Vec<String> = vec![" ".into(), "\r\n".into(), ".".into()];
        let pattern = separators_pattern::<str>(&seps, false, false);
        assert_eq!(pattern, "(?:(?:\r\n)| |\\.)+");
    }

    #[test]
    fn reversed_tables_match_elementwise_reversal() {
        for (table, reversed) in [
            (STR_WHITESPACE, STR_WHITESPACE_REVERSED),
            (STR_LINEBREAKS, STR_LINEBREAKS_REVERSED),
            (UNICODE_WHITESPACE, UNICODE_WHITESPACE_REVERSED),
            (ASCII_WHITESPACE, ASCII_WHITESPACE_REVERSED),
        ] {
            let mut expected: Vec<String> =
                table.iter().map(|s| s.chars().rev().collect()).collect();
            let mut actual: Vec<String> = reversed.iter().map(|s| s.to_string()).collect();
            expected.sort();
            actual.sort();
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn standard_table_lookup_is_by_identity() {
        assert!(reversed_standard_str(STR_WHITESPACE).is_some());
        let copy: Vec<&str> = STR_WHITESPACE.to_vec();
        assert!(reversed_standard_str(&copy).is_none());
    }
}
