//! Right-to-left regex scanning on top of a left-to-right engine.
//!
//! A reverse scanner doesn't yield a suffix of the forward scan: with the
//! pattern `(abcdef|efg|ab|b|c|d)` on `abcdefgh`, the forward engine finds
//! only `abcdef`, while a reverse scan must find `efg`, `d`, `c`, `ab`.
//! So every forward match is checked for overlapping alternatives at each
//! interior position, re-anchoring the engine with an end bound at the
//! start of the previously yielded match.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::split::text::Text;
use crate::SplitError;

fn sort_for_reverse(spans: &mut [(usize, usize)]) {
    // Ascending (end, -start): the last element is the rightmost-ending,
    // earliest-starting match, exactly the next one a reverse scan wants.
    spans.sort_by_key(|&(start, end)| (end, Reverse(start)));
}

/// All non-overlapping matches of `re` in `text` that a right-to-left
/// scanner would produce, in right-to-left order, as (start, end) spans.
pub fn reversed_matches<T: Text + ?Sized>(re: &T::Regex, text: &T) -> Vec<(usize, usize)> {
    let mut matches = T::find_spans(re, text);
    if matches.is_empty() {
        return matches;
    }

    if T::match_at(re, text, 0, 0).is_some() {
        // The pattern admits zero-length matches. In reverse mode a
        // zero-length match is viable wherever no longer match *ends*,
        // so make sure every match start also carries its zero-length
        // twin, without duplicating any.
        let mut zeroes: HashSet<usize> = HashSet::new();
        let mut doctored = Vec::with_capacity(matches.len());
        for &(start, end) in &matches {
            if !zeroes.contains(&start) {
                if start == end {
                    doctored.push((start, end));
                    zeroes.insert(start);
                    continue;
                }
                if T::match_at(re, text, start, start).is_some() {
                    doctored.push((start, start));
                }
                zeroes.insert(start);
            }
            doctored.push((start, end));
        }
        matches = doctored;
    }

    sort_for_reverse(&mut matches);

    let mut overlapping: Vec<(usize, usize)> = Vec::new();
    let mut result = Vec::new();
    let mut previous_match_start = text.len();

    loop {
        if !overlapping.is_empty() {
            // Drop candidates made unviable by the last yielded match;
            // re-anchor the ones that straddle its start.
            let mut truncated = Vec::with_capacity(overlapping.len());
            for &(start, end) in &overlapping {
                if start > previous_match_start {
                    continue;
                }
                if end <= previous_match_start {
                    truncated.push((start, end));
                    continue;
                }
                if let Some(span) = T::match_at(re, text, start, previous_match_start) {
                    truncated.push(span);
                }
            }
            overlapping = truncated;
        }

        if overlapping.is_empty() && !matches.is_empty() {
            // Pull the next still-viable forward match, then scan every
            // interior position for overlapping alternatives the forward
            // engine never reported.
            let mut scan_range = None;
            while let Some((start, end)) = matches.pop() {
                if end <= previous_match_start {
                    overlapping.push((start, end));
                    scan_range = Some((start + 1, end.min(previous_match_start)));
                    break;
                }
            }
            if let Some((from, to)) = scan_range {
                for pos in from..to {
                    if !text.is_unit_boundary(pos) {
                        continue;
                    }
                    if let Some(span) = T::match_at(re, text, pos, previous_match_start) {
                        overlapping.push(span);
                    }
                }
            }
        }

        sort_for_reverse(&mut overlapping);
        match overlapping.pop() {
            None => return result,
            Some(span) => {
                previous_match_start = span.0;
                result.push(span);
            }
        }
    }
}

/// Compile `pattern` for the text variant and return the reverse-order
/// match spans.
pub fn reversed_re_finditer<T: Text + ?Sized>(
    pattern: &str,
    text: &T,
) -> Result<Vec<(usize, usize)>, SplitError> {
    let re = T::compile(pattern).map_err(|e| SplitError::Pattern(e.to_string()))?;
    Ok(reversed_matches::<T>(&re, text))
}

/// Like a string partition, but the separator is a regex. Returns
/// `2 * count + 1` pieces: surrounding text at even positions, matched
/// separator text at odd positions (empty once the pattern runs out,
/// with padding on the right, or on the left when `reverse` is true).
pub fn re_partition<T: Text + ?Sized>(
    text: &T,
    pattern: &str,
    count: usize,
    reverse: bool,
) -> Result<Vec<T::Owned>, SplitError> {
    if reverse {
        return re_rpartition(text, pattern, count);
    }
    if count == 0 {
        return Ok(vec![text.to_owned_text()]);
    }
    let re = T::compile(pattern).map_err(|e| SplitError::Pattern(e.to_string()))?;

    let mut result = Vec::with_capacity(2 * count + 1);
    let mut cursor = 0;
    let mut found = 0;
    for (start, end) in T::find_spans(&re, text) {
        if found == count {
            break;
        }
        result.push(text.slice(cursor, start).to_owned_text());
        result.push(text.slice(start, end).to_owned_text());
        cursor = end;
        found += 1;
    }
    result.push(text.slice(cursor, text.len()).to_owned_text());
    while result.len() < 2 * count + 1 {
        result.push(T::Owned::default());
    }
    Ok(result)
}

/// [`re_partition`] scanning right-to-left; the rightmost match comes
/// last, and padding for missing matches goes on the left.
pub fn re_rpartition<T: Text + ?Sized>(
    text: &T,
    pattern: &str,
    count: usize,
) -> Result<Vec<T::Owned>, SplitError> {
    if count == 0 {
        return Ok(vec![text.to_owned_text()]);
    }
    let re = T::compile(pattern).map_err(|e| SplitError::Pattern(e.to_string()))?;

    let mut tail_first = Vec::with_capacity(2 * count + 1);
    let mut cursor = text.len();
    let mut found = 0;
    for (start, end) in reversed_matches::<T>(&re, text) {
        if found == count {
            break;
        }
        tail_first.push(text.slice(end, cursor).to_owned_text());
        tail_first.push(text.slice(start, end).to_owned_text());
        cursor = start;
        found += 1;
    }
    tail_first.push(text.slice(0, cursor).to_owned_text());

    let mut result = Vec::with_capacity(2 * count + 1);
    while result.len() + tail_first.len() < 2 * count + 1 {
        result.push(T::Owned::default());
    }
    result.extend(tail_first.into_iter().rev());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_preference_on_overlapping_alternation() {
        let spans = reversed_re_finditer("(abcdef|efg|ab|b|c|d)", "abcdefgh").unwrap();
        assert_eq!(spans, vec![(4, 7), (3, 4), (2, 3), (0, 2)]);
    }

    #[test]
    fn rpartition_pads_on_the_left() {
        let pieces = re_rpartition::<str>("a-b", "-", 3).unwrap();
        assert_eq!(pieces, vec!["", "", "", "", "a", "-", "b"]);
    }
}
