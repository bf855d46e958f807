//! Splitting text into quoted and unquoted segments.

use std::borrow::Borrow;

use crate::split::multisplit::multisplit;
use crate::split::text::Text;
use crate::SplitError;

/// Builder returned by [`split_quoted_strings`].
#[derive(Debug, Clone)]
pub struct SplitQuotedStrings<'t, 'q, T: Text + ?Sized> {
    text: &'t T,
    quotes: Option<&'q [&'q T]>,
    multiline_quotes: &'q [&'q T],
    escape: Option<&'q T>,
    state: Option<&'q T>,
}

/// Split `text` into (leading-quote, body, trailing-quote) triples whose
/// concatenation reconstructs the input. Quote markers default to `"` and
/// `'`, the escape string to backslash.
///
/// A quoted section opened by a marker only ends at the next unescaped
/// occurrence of that same marker. Markers from `quotes` reject embedded
/// linebreaks; markers from `multiline_quotes` allow them. An unterminated
/// quote at the end of input is not an error: the final triple simply has
/// an empty trailing quote.
pub fn split_quoted_strings<T: Text + ?Sized>(text: &T) -> SplitQuotedStrings<'_, 'static, T> {
    SplitQuotedStrings {
        text,
        quotes: None,
        multiline_quotes: &[],
        escape: None,
        state: None,
    }
}

impl<'t, 'q, T: Text + ?Sized> SplitQuotedStrings<'t, 'q, T> {
    pub fn quotes(mut self, quotes: &'q [&'q T]) -> Self {
        self.quotes = Some(quotes);
        self
    }

    pub fn multiline_quotes(mut self, quotes: &'q [&'q T]) -> Self {
        self.multiline_quotes = quotes;
        self
    }

    /// Override the escape string. An empty escape disables escaping.
    pub fn escape(mut self, escape: &'q T) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Resume parsing as if `marker` had already been seen: the first
    /// triple then reports an empty leading quote.
    pub fn state(mut self, marker: &'q T) -> Self {
        self.state = Some(marker);
        self
    }

    /// Run the split.
    #[allow(clippy::type_complexity)]
    pub fn triples(self) -> Result<Vec<(T::Owned, T::Owned, T::Owned)>, SplitError> {
        let quotes: Vec<T::Owned> = match self.quotes {
            Some(list) => list.iter().map(|q| q.to_owned_text()).collect(),
            None => T::default_quotes()
                .iter()
                .map(|q| q.to_owned_text())
                .collect(),
        };
        let multiline: Vec<T::Owned> = self
            .multiline_quotes
            .iter()
            .map(|q| q.to_owned_text())
            .collect();
        let escape: T::Owned = match self.escape {
            Some(e) => e.to_owned_text(),
            None => T::default_escape().to_owned_text(),
        };

        validate_markers::<T>(&quotes, &multiline)?;

        let mut all_quotes: Vec<T::Owned> = quotes.clone();
        all_quotes.extend(multiline.iter().cloned());

        let state: Option<T::Owned> = match self.state {
            None => None,
            Some(marker) if marker.is_empty() => None,
            Some(marker) => {
                let owned = marker.to_owned_text();
                if !all_quotes.contains(&owned) {
                    return Err(SplitError::InvalidState(format!("{:?}", marker.key_bytes())));
                }
                Some(owned)
            }
        };

        // The separator alphabet: every quote marker, plus the escaped
        // form of each single-line marker's first unit, plus the escaped
        // escape.
        let mut separators = all_quotes.clone();
        if !escape.borrow().is_empty() {
            for q in &quotes {
                let q: &T = q.borrow();
                let mut tok = escape.clone();
                T::push_onto(&mut tok, q.slice(0, q.head_len()));
                separators.push(tok);
            }
            let mut tok = escape.clone();
            T::push_onto(&mut tok, escape.borrow());
            separators.push(tok);
        }
        separators.sort_by_key(|s| s.borrow().key_bytes());
        separators.dedup();

        if self.text.is_empty() {
            return Ok(vec![(
                T::Owned::default(),
                T::Owned::default(),
                T::Owned::default(),
            )]);
        }

        let sep_refs: Vec<&T> = separators.iter().map(Borrow::borrow).collect();
        let pairs = multisplit(self.text, crate::Separators::List(&sep_refs))
            .separate(true)
            .pairs()?;

        run_machine::<T>(pairs, &all_quotes, &multiline, state)
    }
}

fn validate_markers<T: Text + ?Sized>(
    quotes: &[T::Owned],
    multiline: &[T::Owned],
) -> Result<(), SplitError> {
    if quotes.is_empty() && multiline.is_empty() {
        return Err(SplitError::EmptySeparators);
    }
    for class in [quotes, multiline] {
        for (i, q) in class.iter().enumerate() {
            if q.borrow().is_empty() {
                return Err(SplitError::EmptySeparator);
            }
            if class[..i].contains(q) {
                return Err(SplitError::RepeatedQuote(format!(
                    "{:?}",
                    q.borrow().key_bytes()
                )));
            }
        }
    }
    for q in quotes {
        if multiline.contains(q) {
            return Err(SplitError::QuoteInBothClasses(format!(
                "{:?}",
                q.borrow().key_bytes()
            )));
        }
    }
    Ok(())
}

#[allow(clippy::type_complexity)]
fn run_machine<T: Text + ?Sized>(
    pairs: Vec<(T::Owned, T::Owned)>,
    all_quotes: &[T::Owned],
    multiline: &[T::Owned],
    mut state: Option<T::Owned>,
) -> Result<Vec<(T::Owned, T::Owned, T::Owned)>, SplitError> {
    let empty = T::Owned::default;
    let mut triples = Vec::new();
    let mut buffer: T::Owned = empty();
    let mut quote: Option<T::Owned> = state.clone();
    let mut pos = 0;

    let check_linebreaks = |quote: &T::Owned, body: &T::Owned, at: usize| {
        if !multiline.contains(quote) && body.borrow().contains_linebreak() {
            Err(SplitError::UnterminatedQuote { offset: at })
        } else {
            Ok(())
        }
    };

    for (literal, separator) in pairs {
        if !literal.borrow().is_empty() {
            T::push_onto(&mut buffer, literal.borrow());
            pos += literal.borrow().len();
        }

        match quote.clone() {
            None => {
                if !all_quotes.contains(&separator) {
                    // A final empty separator or an escaped marker
                    // outside any quote is plain body text.
                    T::push_onto(&mut buffer, separator.borrow());
                    pos += separator.borrow().len();
                    continue;
                }
                if !buffer.borrow().is_empty() {
                    triples.push((empty(), std::mem::take(&mut buffer), empty()));
                }
                pos += separator.borrow().len();
                quote = Some(separator);
            }
            Some(open) => {
                if separator != open {
                    T::push_onto(&mut buffer, separator.borrow());
                    pos += separator.borrow().len();
                    continue;
                }
                let body = std::mem::take(&mut buffer);
                check_linebreaks(&open, &body, pos)?;
                pos += separator.borrow().len();
                if state.take().is_some() {
                    triples.push((empty(), body, separator));
                } else {
                    triples.push((open, body, separator));
                }
                quote = None;
            }
        }
    }

    if !buffer.borrow().is_empty() {
        let body = std::mem::take(&mut buffer);
        match quote {
            Some(open) => {
                check_linebreaks(&open, &body, pos)?;
                if state.take().is_some() {
                    triples.push((empty(), body, empty()));
                } else {
                    triples.push((open, body, empty()));
                }
            }
            None => triples.push((empty(), body, empty())),
        }
    } else if let Some(open) = quote {
        // Input ended right after an (unterminated) opening marker.
        if state.take().is_none() {
            triples.push((open, empty(), empty()));
        }
    }

    Ok(triples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(triples: &[(String, String, String)]) -> String {
        triples
            .iter()
            .map(|(a, b, c)| format!("{a}{b}{c}"))
            .collect()
    }

    #[test]
    fn quoted_sections_are_isolated() {
        let input = r#"print("hello") and 'bye'"#;
        let triples = split_quoted_strings(input).triples().unwrap();
        assert_eq!(
            triples,
            vec![
                ("".into(), "print(".into(), "".into()),
                ("\"".into(), "hello".into(), "\"".into()),
                ("".into(), ") and ".into(), "".into()),
                ("'".into(), "bye".into(), "'".into()),
            ]
        );
        assert_eq!(join(&triples), input);
    }

    #[test]
    fn escaped_quote_does_not_close() {
        let input = r#""a\"b""#;
        let triples = split_quoted_strings(input).triples().unwrap();
        assert_eq!(
            triples,
            vec![("\"".into(), "a\\\"b".into(), "\"".into())]
        );
        assert_eq!(join(&triples), input);
    }

    #[test]
    fn resumed_state_reports_empty_leading_quote() {
        let triples = split_quoted_strings("a b c'")
            .state("'")
            .triples()
            .unwrap();
        assert_eq!(triples, vec![("".into(), "a b c".into(), "'".into())]);
    }

    #[test]
    fn linebreak_inside_single_line_quote_errors() {
        let err = split_quoted_strings("'a\nb'").triples().unwrap_err();
        assert!(matches!(err, SplitError::UnterminatedQuote { .. }));
    }

    #[test]
    fn multiline_quotes_allow_linebreaks() {
        let quotes: &[&str] = &["'"];
        let triples = split_quoted_strings("'a\nb'")
            .quotes(&[])
            .multiline_quotes(quotes)
            .triples()
            .unwrap();
        assert_eq!(triples, vec![("'".into(), "a\nb".into(), "'".into())]);
    }

    #[test]
    fn empty_input_yields_one_empty_triple() {
        let triples = split_quoted_strings("").triples().unwrap();
        assert_eq!(triples, vec![("".into(), "".into(), "".into())]);
    }
}
