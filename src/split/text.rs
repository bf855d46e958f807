//! The polymorphic text abstraction used by every splitter.
//!
//! A "text" is either a Unicode string (`str`) or a byte string (`[u8]`).
//! The `Text` trait is sealed over exactly those two; every splitter is
//! generic over it and yields owned texts of the same variant as its
//! input, so the engine has a single code path for both.

use std::borrow::Borrow;
use std::fmt::Write as _;
use std::hash::Hash;

use crate::split::separators::{self, PatternCache};

mod sealed {
    pub trait Sealed {}
    impl Sealed for str {}
    impl Sealed for [u8] {}
}

/// A sequence of code units: `str` (Unicode scalars) or `[u8]` (bytes).
///
/// All offsets are code-unit offsets (byte offsets for both variants;
/// `str` slicing respects `char` boundaries by construction because
/// every offset handed around originates from a regex match or a
/// `char`-boundary walk).
pub trait Text: sealed::Sealed + PartialEq + 'static {
    type Owned: Clone
        + std::fmt::Debug
        + Default
        + PartialEq
        + Eq
        + Hash
        + Borrow<Self>
        + Send
        + Sync;
    type Regex: Send + Sync + 'static;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice(&self, start: usize, stop: usize) -> &Self;
    fn to_owned_text(&self) -> Self::Owned;
    fn push_onto(buffer: &mut Self::Owned, piece: &Self);

    /// The text with its code units in reverse order (`str` reverses by
    /// `char`, `[u8]` by byte).
    fn reversed(&self) -> Self::Owned;

    /// Length of the first code unit (UTF-8 width for `str`, 1 for bytes).
    /// Zero on empty input.
    fn head_len(&self) -> usize;

    /// One owned text per code unit.
    fn units(&self) -> Vec<Self::Owned>;

    fn is_whitespace_only(&self) -> bool;
    fn starts_with_text(&self, prefix: &Self) -> bool;

    /// True when the two texts have at least one code unit in common.
    fn shares_unit_with(&self, other: &Self) -> bool;

    /// Append this text to a regex pattern source, quoted. Whitespace-only
    /// atoms are emitted verbatim (grouped when longer than one unit) so
    /// the compiled patterns stay readable.
    fn quote_into(&self, pattern: &mut String);

    fn compile(pattern: &str) -> Result<Self::Regex, regex::Error>;
    fn find_at(re: &Self::Regex, hay: &Self, start: usize) -> Option<(usize, usize)>;
    fn find_spans(re: &Self::Regex, hay: &Self) -> Vec<(usize, usize)>;

    /// The match that starts exactly at `start` and ends at or before
    /// `end`, if any. Exact under leftmost-first semantics: the engine is
    /// run over `hay[..end]` from `start`, and a match starting later
    /// proves no match starts at `start`.
    fn match_at(re: &Self::Regex, hay: &Self, start: usize, end: usize) -> Option<(usize, usize)> {
        let clipped = hay.slice(0, end);
        Self::find_at(re, clipped, start).filter(|&(s, _)| s == start)
    }

    fn contains_linebreak(&self) -> bool;

    /// True when `pos` is a valid code-unit boundary (always true for
    /// bytes; a `char` boundary for `str`).
    fn is_unit_boundary(&self, pos: usize) -> bool;

    /// Bytes of the text, for variant-agnostic cache keys.
    fn key_bytes(&self) -> Vec<u8>;

    fn default_whitespace() -> &'static [&'static Self];
    fn default_linebreaks() -> &'static [&'static Self];
    fn linebreaks_without_crlf() -> &'static [&'static Self];
    fn default_quotes() -> &'static [&'static Self];
    fn default_escape() -> &'static Self;
    fn backslash() -> &'static Self;

    fn pattern_cache() -> &'static PatternCache<Self::Regex>;

    /// The variant's default delimiter map: `()`, `[]`, `{}` nesting,
    /// `''` and `""` quoting with backslash escape.
    fn default_delimiters() -> &'static [(Self::Owned, crate::split::delimiters::Delimiter<Self>)];

    /// Precomputed reversed form of a standard separator table, selected
    /// by table identity.
    fn reversed_standard(seps: &[&Self]) -> Option<&'static [&'static Self]>;
}

impl Text for str {
    type Owned = String;
    type Regex = regex::Regex;

    fn len(&self) -> usize {
        str::len(self)
    }

    fn slice(&self, start: usize, stop: usize) -> &Self {
        &self[start..stop]
    }

    fn to_owned_text(&self) -> String {
        self.to_string()
    }

    fn push_onto(buffer: &mut String, piece: &str) {
        buffer.push_str(piece);
    }

    fn reversed(&self) -> String {
        self.chars().rev().collect()
    }

    fn head_len(&self) -> usize {
        self.chars().next().map_or(0, char::len_utf8)
    }

    fn units(&self) -> Vec<String> {
        self.chars().map(String::from).collect()
    }

    fn is_whitespace_only(&self) -> bool {
        !self.is_empty() && self.chars().all(char::is_whitespace)
    }

    fn starts_with_text(&self, prefix: &str) -> bool {
        self.starts_with(prefix)
    }

    fn shares_unit_with(&self, other: &str) -> bool {
        self.chars().any(|c| other.contains(c))
    }

    fn quote_into(&self, pattern: &mut String) {
        if self.is_whitespace_only() {
            if self.chars().count() > 1 {
                pattern.push_str("(?:");
                pattern.push_str(self);
                pattern.push(')');
            } else {
                pattern.push_str(self);
            }
        } else {
            pattern.push_str(&regex::escape(self));
        }
    }

    fn compile(pattern: &str) -> Result<regex::Regex, regex::Error> {
        regex::Regex::new(pattern)
    }

    fn find_at(re: &regex::Regex, hay: &str, start: usize) -> Option<(usize, usize)> {
        re.find_at(hay, start).map(|m| (m.start(), m.end()))
    }

    fn find_spans(re: &regex::Regex, hay: &str) -> Vec<(usize, usize)> {
        re.find_iter(hay).map(|m| (m.start(), m.end())).collect()
    }

    fn contains_linebreak(&self) -> bool {
        self.chars().any(separators::is_str_linebreak_char)
    }

    fn is_unit_boundary(&self, pos: usize) -> bool {
        self.is_char_boundary(pos)
    }

    fn key_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn default_whitespace() -> &'static [&'static str] {
        separators::STR_WHITESPACE
    }

    fn default_linebreaks() -> &'static [&'static str] {
        separators::STR_LINEBREAKS
    }

    fn linebreaks_without_crlf() -> &'static [&'static str] {
        separators::STR_LINEBREAKS_WITHOUT_CRLF
    }

    fn default_quotes() -> &'static [&'static str] {
        &["\"", "'"]
    }

    fn default_escape() -> &'static str {
        "\\"
    }

    fn backslash() -> &'static str {
        "\\"
    }

    fn pattern_cache() -> &'static PatternCache<regex::Regex> {
        separators::str_pattern_cache()
    }

    fn default_delimiters() -> &'static [(String, crate::split::delimiters::Delimiter<str>)] {
        crate::split::delimiters::default_str_delimiters()
    }

    fn reversed_standard(seps: &[&str]) -> Option<&'static [&'static str]> {
        separators::reversed_standard_str(seps)
    }
}

impl Text for [u8] {
    type Owned = Vec<u8>;
    type Regex = regex::bytes::Regex;

    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn slice(&self, start: usize, stop: usize) -> &Self {
        &self[start..stop]
    }

    fn to_owned_text(&self) -> Vec<u8> {
        self.to_vec()
    }

    fn push_onto(buffer: &mut Vec<u8>, piece: &[u8]) {
        buffer.extend_from_slice(piece);
    }

    fn reversed(&self) -> Vec<u8> {
        let mut v = self.to_vec();
        v.reverse();
        v
    }

    fn head_len(&self) -> usize {
        usize::from(!self.is_empty())
    }

    fn units(&self) -> Vec<Vec<u8>> {
        self.iter().map(|b| vec![*b]).collect()
    }

    fn is_whitespace_only(&self) -> bool {
        !self.is_empty() && self.iter().all(|b| b.is_ascii_whitespace())
    }

    fn starts_with_text(&self, prefix: &[u8]) -> bool {
        self.starts_with(prefix)
    }

    fn shares_unit_with(&self, other: &[u8]) -> bool {
        self.iter().any(|b| other.contains(b))
    }

    fn quote_into(&self, pattern: &mut String) {
        if self.is_whitespace_only() {
            // ASCII whitespace is valid pattern text as-is.
            let verbatim: String = self.iter().map(|&b| b as char).collect();
            if self.len() > 1 {
                pattern.push_str("(?:");
                pattern.push_str(&verbatim);
                pattern.push(')');
            } else {
                pattern.push_str(&verbatim);
            }
            return;
        }
        for &b in self {
            if b.is_ascii() {
                let mut unit = [0u8; 4];
                let c = b as char;
                pattern.push_str(&regex::escape(c.encode_utf8(&mut unit)));
            } else {
                // Unicode mode is disabled for byte patterns, so a hex
                // escape matches the raw byte.
                let _ = write!(pattern, "\\x{b:02x}");
            }
        }
    }

    fn compile(pattern: &str) -> Result<regex::bytes::Regex, regex::Error> {
        regex::bytes::RegexBuilder::new(pattern)
            .unicode(false)
            .build()
    }

    fn find_at(re: &regex::bytes::Regex, hay: &[u8], start: usize) -> Option<(usize, usize)> {
        re.find_at(hay, start).map(|m| (m.start(), m.end()))
    }

    fn find_spans(re: &regex::bytes::Regex, hay: &[u8]) -> Vec<(usize, usize)> {
        re.find_iter(hay).map(|m| (m.start(), m.end())).collect()
    }

    fn contains_linebreak(&self) -> bool {
        self.iter().any(|b| matches!(b, b'\n' | b'\r'))
    }

    fn is_unit_boundary(&self, _pos: usize) -> bool {
        true
    }

    fn key_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }

    fn default_whitespace() -> &'static [&'static [u8]] {
        separators::BYTES_WHITESPACE
    }

    fn default_linebreaks() -> &'static [&'static [u8]] {
        separators::BYTES_LINEBREAKS
    }

    fn linebreaks_without_crlf() -> &'static [&'static [u8]] {
        separators::BYTES_LINEBREAKS_WITHOUT_CRLF
    }

    fn default_quotes() -> &'static [&'static [u8]] {
        &[b"\"", b"'"]
    }

    fn default_escape() -> &'static [u8] {
        b"\\"
    }

    fn backslash() -> &'static [u8] {
        b"\\"
    }

    fn pattern_cache() -> &'static PatternCache<regex::bytes::Regex> {
        separators::bytes_pattern_cache()
    }

    fn default_delimiters() -> &'static [(Vec<u8>, crate::split::delimiters::Delimiter<[u8]>)] {
        crate::split::delimiters::default_bytes_delimiters()
    }

    fn reversed_standard(seps: &[&[u8]]) -> Option<&'static [&'static [u8]]> {
        separators::reversed_standard_bytes(seps)
    }
}

/// Separator input: either a collection of separator texts, or a single
/// text whose code units each act as a one-unit separator.
#[derive(Debug)]
pub enum Separators<'a, T: Text + ?Sized> {
    /// Each code unit of the text is a separator.
    Units(&'a T),
    /// An ordered collection of separator texts.
    List(&'a [&'a T]),
}

impl<'a, T: Text + ?Sized> Clone for Separators<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Text + ?Sized> Copy for Separators<'a, T> {}

impl<'a> From<&'a str> for Separators<'a, str> {
    fn from(s: &'a str) -> Self {
        Separators::Units(s)
    }
}

impl<'a> From<&'a [&'a str]> for Separators<'a, str> {
    fn from(seps: &'a [&'a str]) -> Self {
        Separators::List(seps)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Separators<'a, str> {
    fn from(seps: &'a [&'a str; N]) -> Self {
        Separators::List(seps)
    }
}

impl<'a> From<&'a [u8]> for Separators<'a, [u8]> {
    fn from(s: &'a [u8]) -> Self {
        Separators::Units(s)
    }
}

impl<'a> From<&'a [&'a [u8]]> for Separators<'a, [u8]> {
    fn from(seps: &'a [&'a [u8]]) -> Self {
        Separators::List(seps)
    }
}

impl<'a, const N: usize> From<&'a [&'a [u8]; N]> for Separators<'a, [u8]> {
    fn from(seps: &'a [&'a [u8]; N]) -> Self {
        Separators::List(seps)
    }
}

impl<T: Text + ?Sized> Separators<'static, T> {
    /// The variant's standard whitespace table.
    pub fn whitespace() -> Self {
        Separators::List(T::default_whitespace())
    }

    /// The variant's standard linebreak table.
    pub fn linebreaks() -> Self {
        Separators::List(T::default_linebreaks())
    }
}

impl<'a, T: Text + ?Sized> Separators<'a, T> {
    /// Normalize to an owned separator list, validating that the
    /// collection and every element are non-empty.
    pub(crate) fn normalize(&self) -> Result<Vec<T::Owned>, crate::SplitError> {
        let seps: Vec<T::Owned> = match self {
            Separators::Units(text) => text.units(),
            Separators::List(list) => list.iter().map(|s| s.to_owned_text()).collect(),
        };
        if seps.is_empty() {
            return Err(crate::SplitError::EmptySeparators);
        }
        if seps.iter().any(|s| s.borrow().is_empty()) {
            return Err(crate::SplitError::EmptySeparator);
        }
        Ok(seps)
    }

    /// The borrowed standard-table slice, when this separator set is one
    /// of the exported constants (used to pick precomputed reversals).
    pub(crate) fn as_static_list(&self) -> Option<&'a [&'a T]> {
        match self {
            Separators::List(list) => Some(list),
            Separators::Units(_) => None,
        }
    }
}
