//! Greedy multi-separator splitting: `multisplit`, `multistrip`, and
//! `multipartition`.
//!
//! The engine scans the text with a compiled separator alternation and
//! materializes the alternating non-separator/separator piece list, then
//! shapes it according to the keep mode. Reverse mode reverses the text
//! and separators, scans forward, and un-reverses the output, which
//! prefers the rightmost separator wherever separators overlap.

use std::borrow::Borrow;

use crate::split::separators;
use crate::split::text::{Separators, Text};
use crate::SplitError;

/// What to do with the separator strings.
///
/// The pair form (non-separator, following-separator) has its own
/// terminal method, [`Multisplit::pairs`], since it yields tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Keep {
    /// Discard the separators.
    #[default]
    Discard,
    /// Append each separator to the piece it follows; joining the output
    /// reconstructs the input.
    Attached,
    /// Yield strictly alternating non-separator and separator pieces,
    /// starting and ending with a (possibly empty) non-separator.
    Alternating,
}

/// Whether and how to strip separators from the ends before splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strip {
    #[default]
    No,
    Both,
    Left,
    Right,
    /// Strip both ends, unless a bounded `maxsplit` stopped splitting
    /// before the text was exhausted; then the end where splitting
    /// stopped keeps its separators. This reproduces
    /// `"  a b c  ".split(None, maxsplit=2) == ["a", "b", "c  "]`.
    Progressive,
}

/// Builder returned by [`multisplit`].
#[derive(Debug, Clone)]
pub struct Multisplit<'t, 's, T: Text + ?Sized> {
    text: &'t T,
    separators: Separators<'s, T>,
    keep: Keep,
    maxsplit: Option<usize>,
    reverse: bool,
    separate: bool,
    strip: Strip,
}

/// Split `text` on any of `separators`, greedily preferring the longest
/// matching separator. Configure with the builder methods, then call
/// [`Multisplit::segments`] or [`Multisplit::pairs`].
pub fn multisplit<'t, 's, T, S>(text: &'t T, separators: S) -> Multisplit<'t, 's, T>
where
    T: Text + ?Sized,
    S: Into<Separators<'s, T>>,
{
    Multisplit {
        text,
        separators: separators.into(),
        keep: Keep::Discard,
        maxsplit: None,
        reverse: false,
        separate: false,
        strip: Strip::No,
    }
}

impl<'t, 's, T: Text + ?Sized> Multisplit<'t, 's, T> {
    pub fn keep(mut self, keep: Keep) -> Self {
        self.keep = keep;
        self
    }

    /// Split at most `n` times. Without this, splitting is unbounded.
    pub fn maxsplit(mut self, n: usize) -> Self {
        self.maxsplit = Some(n);
        self
    }

    /// Split starting from the end of the text, preferring the rightmost
    /// separator where separators overlap. Output order stays
    /// left-to-right.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Treat each separator individually instead of merging adjacent
    /// separators into one.
    pub fn separate(mut self, separate: bool) -> Self {
        self.separate = separate;
        self
    }

    pub fn strip(mut self, strip: Strip) -> Self {
        self.strip = strip;
        self
    }

    /// Run the split, yielding pieces per the configured [`Keep`] mode.
    pub fn segments(self) -> Result<Vec<T::Owned>, SplitError> {
        let keep = self.keep;
        let alternating = self.alternating()?;
        Ok(match keep {
            Keep::Alternating => alternating,
            Keep::Discard => alternating
                .into_iter()
                .step_by(2)
                .collect(),
            Keep::Attached => {
                let mut evened = alternating;
                if evened.len() % 2 == 1 {
                    evened.push(T::Owned::default());
                }
                let mut out = Vec::with_capacity(evened.len() / 2);
                let mut it = evened.into_iter();
                while let (Some(piece), Some(sep)) = (it.next(), it.next()) {
                    let mut joined = piece;
                    T::push_onto(&mut joined, sep.borrow());
                    out.push(joined);
                }
                out
            }
        })
    }

    /// Run the split, yielding (non-separator, following-separator)
    /// pairs. The final pair's separator is always empty; if the text
    /// ends with a separator, the final pair is empty entirely.
    pub fn pairs(self) -> Result<Vec<(T::Owned, T::Owned)>, SplitError> {
        let mut alternating = self.alternating()?;
        if alternating.len() % 2 == 1 {
            alternating.push(T::Owned::default());
        }
        let mut out = Vec::with_capacity(alternating.len() / 2);
        let mut it = alternating.into_iter();
        while let (Some(piece), Some(sep)) = (it.next(), it.next()) {
            out.push((piece, sep));
        }
        Ok(out)
    }

    /// The alternating piece list in forward orientation:
    /// [non-sep, sep, non-sep, ..., non-sep] (odd length), except after
    /// progressive truncation, which may leave an even length ending in a
    /// separator piece.
    fn alternating(&self) -> Result<Vec<T::Owned>, SplitError> {
        let normalized = self.separators.normalize()?;

        // Strip first; a bounded maxsplit then applies to the stripped
        // text.
        let (left, right, progressive) = match (self.strip, self.maxsplit) {
            (Strip::No, _) => (false, false, false),
            (Strip::Both, _) => (true, true, false),
            (Strip::Left, _) => (true, false, false),
            (Strip::Right, _) => (false, true, false),
            (Strip::Progressive, None) => (true, true, false),
            (Strip::Progressive, Some(_)) => (!self.reverse, self.reverse, true),
        };
        let (start, stop) = multistrip_span::<T>(self.text, &normalized, left, right);
        let stripped = self.text.slice(start, stop);

        // A maxsplit of zero, or a text stripped to nothing, yields the
        // input unchanged as a single piece.
        if self.maxsplit == Some(0) || (stripped.is_empty() && self.strip != Strip::No) {
            return Ok(vec![stripped.to_owned_text()]);
        }

        let scan_owned;
        let scan_text: &T;
        let scan_separators: Vec<T::Owned>;
        if self.reverse {
            scan_owned = stripped.reversed();
            scan_text = scan_owned.borrow();
            scan_separators = match self
                .separators
                .as_static_list()
                .and_then(|list| T::reversed_standard(list))
            {
                Some(precomputed) => precomputed.iter().map(|s| s.to_owned_text()).collect(),
                None => normalized.iter().map(|s| s.borrow().reversed()).collect(),
            };
        } else {
            scan_text = stripped;
            scan_separators = normalized;
        }

        let mut alternating =
            scan_alternating::<T>(scan_text, &scan_separators, self.separate, self.maxsplit);

        if progressive {
            let maxsplit = self.maxsplit.unwrap_or(0);
            progressive_truncate::<T>(&mut alternating, maxsplit);
        }

        if self.reverse {
            alternating.reverse();
            for piece in &mut alternating {
                let borrowed: &T = (*piece).borrow();
                *piece = borrowed.reversed();
            }
        }

        Ok(alternating)
    }
}

/// Scan `text` with the compiled separator pattern and build the
/// alternating piece list, consuming at most `maxsplit` separator
/// matches.
fn scan_alternating<T: Text + ?Sized>(
    text: &T,
    separators: &[T::Owned],
    separate: bool,
    maxsplit: Option<usize>,
) -> Vec<T::Owned> {
    let re = separators::compiled::<T>(separators, separate, false);
    let mut pieces = Vec::new();
    let mut cursor = 0;
    let mut splits = 0;
    for (start, stop) in T::find_spans(&re, text) {
        if let Some(limit) = maxsplit {
            if splits >= limit {
                break;
            }
        }
        pieces.push(text.slice(cursor, start).to_owned_text());
        pieces.push(text.slice(start, stop).to_owned_text());
        cursor = stop;
        splits += 1;
    }
    pieces.push(text.slice(cursor, text.len()).to_owned_text());
    pieces
}

/// Progressive-strip truncation: when a bounded maxsplit would have
/// stopped before the scan end, drop the trailing separator run (in scan
/// orientation) so the unsplit side keeps its text.
fn progressive_truncate<T: Text + ?Sized>(alternating: &mut Vec<T::Owned>, maxsplit: usize) {
    let length = alternating.len();
    debug_assert!(length % 2 == 1);

    let mut last_non_empty = 0;
    let mut index = length - 1;
    while index > 0 {
        if !alternating[index].borrow().is_empty() {
            last_non_empty = index;
            break;
        }
        index -= 2;
    }

    let desired_length = 1 + 2 * maxsplit;
    if desired_length > last_non_empty + 2 {
        alternating.truncate(last_non_empty + 1);
    }
}

/// Compute the post-strip slice bounds of `text`.
fn multistrip_span<T: Text + ?Sized>(
    text: &T,
    separators: &[T::Owned],
    left: bool,
    right: bool,
) -> (usize, usize) {
    if !(left || right) {
        return (0, text.len());
    }
    let re = separators::compiled::<T>(separators, false, false);
    let mut start = 0;
    let mut stop = text.len();
    if left {
        if let Some((0, end)) = T::find_at(&re, text, 0) {
            start = end;
        }
    }
    if right && start < stop {
        let trailing = T::find_spans(&re, text.slice(start, stop))
            .into_iter()
            .last();
        if let Some((run_start, run_stop)) = trailing {
            if start + run_stop == stop {
                stop = start + run_start;
            }
        }
    }
    (start, stop)
}

/// Strip any number of leading and/or trailing separators, greedily
/// preferring the longest match at each position.
pub fn multistrip<'s, T, S>(
    text: &T,
    separators: S,
    left: bool,
    right: bool,
) -> Result<T::Owned, SplitError>
where
    T: Text + ?Sized,
    S: Into<Separators<'s, T>>,
{
    let normalized = separators.into().normalize()?;
    let (start, stop) = multistrip_span::<T>(text, &normalized, left, right);
    Ok(text.slice(start, stop).to_owned_text())
}

fn multipartition_impl<'s, T, S>(
    text: &T,
    separators: S,
    count: usize,
    reverse: bool,
    separate: bool,
) -> Result<Vec<T::Owned>, SplitError>
where
    T: Text + ?Sized,
    S: Into<Separators<'s, T>>,
{
    let mut result = multisplit(text, separators)
        .keep(Keep::Alternating)
        .reverse(reverse)
        .separate(separate)
        .maxsplit(count)
        .segments()?;

    let desired = 2 * count + 1;
    while result.len() < desired {
        if reverse {
            result.insert(0, T::Owned::default());
        } else {
            result.push(T::Owned::default());
        }
    }
    Ok(result)
}

/// Partition `text` at the first `count` separator occurrences, returning
/// exactly `2 * count + 1` pieces: text and separators alternating,
/// right-padded with empty pieces when fewer separators were found.
///
/// Adjacent separators are treated individually (`separate=true`); use
/// [`multisplit`] with [`Keep::Alternating`] for merged runs.
pub fn multipartition<'s, T, S>(
    text: &T,
    separators: S,
    count: usize,
) -> Result<Vec<T::Owned>, SplitError>
where
    T: Text + ?Sized,
    S: Into<Separators<'s, T>>,
{
    multipartition_impl(text, separators, count, false, true)
}

/// [`multipartition`] scanning from the right; padding goes on the left.
pub fn multirpartition<'s, T, S>(
    text: &T,
    separators: S,
    count: usize,
) -> Result<Vec<T::Owned>, SplitError>
where
    T: Text + ?Sized,
    S: Into<Separators<'s, T>>,
{
    multipartition_impl(text, separators, count, true, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_separators_prefer_longest() {
        let pieces = multisplit("wxabcyz", &["a", "abc"]).segments().unwrap();
        assert_eq!(pieces, vec!["wx", "yz"]);
    }

    #[test]
    fn reverse_overlap_prefers_rightmost() {
        let pieces = multisplit("A x x Z", &[" x "])
            .keep(Keep::Alternating)
            .reverse(true)
            .segments()
            .unwrap();
        assert_eq!(pieces, vec!["A x", " x ", "Z"]);
    }

    #[test]
    fn progressive_strip_mirrors_python_whitespace_split() {
        let pieces = multisplit("  a b c  ", Separators::<str>::whitespace())
            .maxsplit(2)
            .strip(Strip::Progressive)
            .segments()
            .unwrap();
        assert_eq!(pieces, vec!["a", "b", "c  "]);
    }

    #[test]
    fn empty_input_yields_one_empty_piece() {
        let pieces = multisplit("", &[","]).segments().unwrap();
        assert_eq!(pieces, vec![""]);
    }

    #[test]
    fn maxsplit_zero_yields_input_unchanged() {
        let pieces = multisplit("a,b", &[","]).maxsplit(0).segments().unwrap();
        assert_eq!(pieces, vec!["a,b"]);
    }

    #[test]
    fn bytes_variant_splits_too() {
        let seps: &[&[u8]] = &[b","];
        let pieces = multisplit(b"a,b,c".as_slice(), seps).segments().unwrap();
        assert_eq!(pieces, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }
}
