//! Nested open/close delimiter parsing with per-delimiter quoting,
//! escape, and multiline policies.
//!
//! A delimiter set compiles (once, memoized) into a token alphabet and a
//! transition table per state. The traversal then rides a single
//! multisplit over the whole alphabet; the resplit actions exist to
//! repair the rare cases where a token recognized by multisplit overlaps
//! a delimiter that the *current* state interprets differently.

use std::any::{Any, TypeId};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::split::multisplit::multisplit;
use crate::split::text::{Separators, Text};
use crate::SplitError;

/// A delimiter description, keyed externally by its open marker.
pub struct Delimiter<T: Text + ?Sized> {
    close: T::Owned,
    escape: T::Owned,
    quoting: bool,
    multiline: bool,
}

impl<T: Text + ?Sized> Delimiter<T> {
    /// A nesting delimiter: other delimiters are recognized inside it,
    /// newlines are allowed, nothing is escaped.
    pub fn nesting(close: &T) -> Result<Self, SplitError> {
        if close.is_empty() {
            return Err(SplitError::EmptySeparator);
        }
        if close == T::backslash() {
            return Err(SplitError::IllegalDelimiter(
                "close delimiter must not be backslash".into(),
            ));
        }
        Ok(Delimiter {
            close: close.to_owned_text(),
            escape: T::Owned::default(),
            quoting: false,
            multiline: true,
        })
    }

    /// A quoting delimiter: everything up to the matching close marker is
    /// opaque, the close marker can be escaped, and newlines may be
    /// forbidden (`multiline=false`).
    pub fn quoting(close: &T, escape: &T, multiline: bool) -> Result<Self, SplitError> {
        if close.is_empty() {
            return Err(SplitError::EmptySeparator);
        }
        if close == T::backslash() {
            return Err(SplitError::IllegalDelimiter(
                "close delimiter must not be backslash".into(),
            ));
        }
        if escape.is_empty() {
            return Err(SplitError::IllegalDelimiter(
                "quoting delimiters require a non-empty escape".into(),
            ));
        }
        Ok(Delimiter {
            close: close.to_owned_text(),
            escape: escape.to_owned_text(),
            quoting: true,
            multiline,
        })
    }

    pub fn close(&self) -> &T {
        self.close.borrow()
    }

    pub fn escape(&self) -> &T {
        self.escape.borrow()
    }

    pub fn is_quoting(&self) -> bool {
        self.quoting
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    fn cache_key(&self) -> (Vec<u8>, Vec<u8>, bool, bool) {
        (
            self.close.borrow().key_bytes(),
            self.escape.borrow().key_bytes(),
            self.quoting,
            self.multiline,
        )
    }
}

impl<T: Text + ?Sized> Clone for Delimiter<T> {
    fn clone(&self) -> Self {
        Delimiter {
            close: self.close.clone(),
            escape: self.escape.clone(),
            quoting: self.quoting,
            multiline: self.multiline,
        }
    }
}

impl<T: Text + ?Sized> fmt::Debug for Delimiter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delimiter")
            .field("close", &self.close)
            .field("escape", &self.escape)
            .field("quoting", &self.quoting)
            .field("multiline", &self.multiline)
            .finish()
    }
}

impl<T: Text + ?Sized> PartialEq for Delimiter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.close == other.close
            && self.escape == other.escape
            && self.quoting == other.quoting
            && self.multiline == other.multiline
    }
}

impl<T: Text + ?Sized> Eq for Delimiter<T> {}

enum Action<T: Text + ?Sized> {
    Push(usize),
    Pop,
    Escape,
    Flush1AndResplit,
    /// The token begins with the current state's close or escape; behave
    /// as if that shorter string had been received and resplit after it.
    TruncateTo(T::Owned),
    Illegal,
    IllegalNewline,
}

impl<T: Text + ?Sized> Clone for Action<T> {
    fn clone(&self) -> Self {
        match self {
            Action::Push(sid) => Action::Push(*sid),
            Action::Pop => Action::Pop,
            Action::Escape => Action::Escape,
            Action::Flush1AndResplit => Action::Flush1AndResplit,
            Action::TruncateTo(s) => Action::TruncateTo(s.clone()),
            Action::Illegal => Action::Illegal,
            Action::IllegalNewline => Action::IllegalNewline,
        }
    }
}

struct Table<T: Text + ?Sized> {
    all_tokens: Vec<T::Owned>,
    /// Transition maps; state 0 is the initial state. Tokens absent from
    /// the current map are flushed as ordinary body text.
    states: Vec<HashMap<T::Owned, Action<T>>>,
}

type TableKey = (TypeId, Vec<(Vec<u8>, Vec<u8>, Vec<u8>, bool, bool)>);

static TABLES: Lazy<Mutex<HashMap<TableKey, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

const TABLE_CACHE_CAPACITY: usize = 512;

fn compiled_table<T: Text + ?Sized>(
    delimiters: &[(T::Owned, Delimiter<T>)],
) -> Result<Arc<Table<T>>, SplitError> {
    let key: TableKey = (
        TypeId::of::<T>(),
        delimiters
            .iter()
            .map(|(open, d)| {
                let (close, escape, quoting, multiline) = d.cache_key();
                (open.borrow().key_bytes(), close, escape, quoting, multiline)
            })
            .collect(),
    );

    {
        let tables = TABLES.lock();
        if let Some(found) = tables.get(&key) {
            if let Ok(table) = Arc::clone(found).downcast::<Table<T>>() {
                return Ok(table);
            }
        }
    }

    let table = Arc::new(build_table(delimiters)?);
    let mut tables = TABLES.lock();
    if tables.len() >= TABLE_CACHE_CAPACITY {
        tables.clear();
    }
    tables.insert(key, Arc::clone(&table) as Arc<dyn Any + Send + Sync>);
    Ok(table)
}

fn build_table<T: Text + ?Sized>(
    delimiters: &[(T::Owned, Delimiter<T>)],
) -> Result<Table<T>, SplitError> {
    if delimiters.is_empty() {
        return Err(SplitError::EmptySeparators);
    }

    let mut all_openers: Vec<T::Owned> = Vec::new();
    let mut all_closers: Vec<T::Owned> = Vec::new();
    let mut all_escapes: Vec<T::Owned> = Vec::new();
    let mut nested_closers: Vec<T::Owned> = Vec::new();
    let mut any_single_line = false;

    for (open, d) in delimiters {
        let open_text: &T = open.borrow();
        if open_text.is_empty() {
            return Err(SplitError::EmptySeparator);
        }
        if open_text == T::backslash() {
            return Err(SplitError::IllegalDelimiter(
                "open delimiter must not be backslash".into(),
            ));
        }
        if all_openers.contains(open) {
            return Err(SplitError::RepeatedDelimiter(format!(
                "{:?}",
                open_text.key_bytes()
            )));
        }
        all_openers.push(open.clone());
        if !all_closers.contains(&d.close) {
            all_closers.push(d.close.clone());
        }
        if d.quoting {
            if !all_escapes.contains(&d.escape) {
                all_escapes.push(d.escape.clone());
            }
        } else if !nested_closers.contains(&d.close) {
            nested_closers.push(d.close.clone());
        }
        if !d.multiline {
            any_single_line = true;
        }
    }

    for open in &all_openers {
        if nested_closers.contains(open) {
            return Err(SplitError::OpenAndCloseDelimiter(format!(
                "{:?}",
                open.borrow().key_bytes()
            )));
        }
    }

    let newlines: Vec<T::Owned> = if any_single_line {
        T::linebreaks_without_crlf()
            .iter()
            .map(|s| s.to_owned_text())
            .collect()
    } else {
        Vec::new()
    };

    let mut delimiter_tokens: Vec<T::Owned> = Vec::new();
    for tok in all_openers
        .iter()
        .chain(all_closers.iter())
        .chain(all_escapes.iter())
    {
        if !delimiter_tokens.contains(tok) {
            delimiter_tokens.push(tok.clone());
        }
    }
    let mut all_tokens = delimiter_tokens.clone();
    for nl in &newlines {
        if !all_tokens.contains(nl) {
            all_tokens.push(nl.clone());
        }
    }

    // Every delimiter token that a non-quoting state doesn't explicitly
    // handle is illegal there; an unhandled token in a quoting state is
    // just body text.
    let non_quoting_defaults: HashMap<T::Owned, Action<T>> = delimiter_tokens
        .iter()
        .map(|tok| (tok.clone(), Action::Illegal))
        .collect();

    let mut states: Vec<HashMap<T::Owned, Action<T>>> = vec![non_quoting_defaults.clone()];
    let mut states_wanting_pushes: Vec<usize> = vec![0];
    let mut push_delimiters: Vec<(T::Owned, usize)> = Vec::new();

    for (open, d) in delimiters {
        let sid = states.len();
        let mut state: HashMap<T::Owned, Action<T>>;
        let quoting_units: Option<Vec<T::Owned>> = if d.quoting {
            state = HashMap::new();
            let mut units = d.close.borrow().units();
            units.extend(d.escape.borrow().units());
            Some(units)
        } else {
            state = non_quoting_defaults.clone();
            states_wanting_pushes.push(sid);
            None
        };

        let mut own_markers: Vec<T::Owned> = vec![d.close.clone()];
        if !d.escape.borrow().is_empty() {
            own_markers.push(d.escape.clone());
        }

        for tok in &all_tokens {
            for marker in &own_markers {
                if tok == marker {
                    continue;
                }
                if tok.borrow().starts_with_text(marker.borrow()) {
                    // startswith takes priority over mere character
                    // overlap.
                    state.insert(tok.clone(), Action::TruncateTo(marker.clone()));
                    break;
                }
                if let Some(units) = &quoting_units {
                    let tok_text: &T = tok.borrow();
                    if units.iter().any(|u| tok_text.shares_unit_with(u.borrow())) {
                        state.insert(tok.clone(), Action::Flush1AndResplit);
                    }
                }
            }
        }

        if d.quoting && !d.multiline {
            for nl in &newlines {
                state.insert(nl.clone(), Action::IllegalNewline);
            }
        }

        state.insert(d.close.clone(), Action::Pop);
        if !d.escape.borrow().is_empty() {
            state.insert(d.escape.clone(), Action::Escape);
        }

        states.push(state);
        push_delimiters.push((open.clone(), sid));
    }

    for sid in states_wanting_pushes {
        for (open, target) in &push_delimiters {
            states[sid].insert(open.clone(), Action::Push(*target));
        }
    }

    Ok(Table { all_tokens, states })
}

pub(crate) fn default_str_delimiters() -> &'static [(String, Delimiter<str>)] {
    static DEFAULTS: Lazy<Vec<(String, Delimiter<str>)>> = Lazy::new(|| {
        vec![
            ("(".into(), nesting_raw::<str>(")")),
            ("[".into(), nesting_raw::<str>("]")),
            ("{".into(), nesting_raw::<str>("}")),
            ("'".into(), quoting_raw::<str>("'", "\\")),
            ("\"".into(), quoting_raw::<str>("\"", "\\")),
        ]
    });
    &DEFAULTS
}

pub(crate) fn default_bytes_delimiters() -> &'static [(Vec<u8>, Delimiter<[u8]>)] {
    static DEFAULTS: Lazy<Vec<(Vec<u8>, Delimiter<[u8]>)>> = Lazy::new(|| {
        vec![
            (b"(".to_vec(), nesting_raw::<[u8]>(b")")),
            (b"[".to_vec(), nesting_raw::<[u8]>(b"]")),
            (b"{".to_vec(), nesting_raw::<[u8]>(b"}")),
            (b"'".to_vec(), quoting_raw::<[u8]>(b"'", b"\\")),
            (b"\"".to_vec(), quoting_raw::<[u8]>(b"\"", b"\\")),
        ]
    });
    &DEFAULTS
}

fn nesting_raw<T: Text + ?Sized>(close: &T) -> Delimiter<T> {
    Delimiter {
        close: close.to_owned_text(),
        escape: T::Owned::default(),
        quoting: false,
        multiline: true,
    }
}

fn quoting_raw<T: Text + ?Sized>(close: &T, escape: &T) -> Delimiter<T> {
    Delimiter {
        close: close.to_owned_text(),
        escape: escape.to_owned_text(),
        quoting: true,
        multiline: false,
    }
}

/// Builder returned by [`split_delimiters`].
#[derive(Debug, Clone)]
pub struct SplitDelimiters<'t, 'd, T: Text + ?Sized> {
    text: &'t T,
    delimiters: Option<&'d [(&'d T, Delimiter<T>)]>,
    state: &'d [&'d T],
}

/// Split `text` at nested delimiter markers, yielding
/// (body, open, close) triples whose concatenation reconstructs the
/// input. At most one of open/close is non-empty per triple; the final
/// trailing body has both empty.
///
/// Without an explicit delimiter map, the default set is used:
/// `()`, `[]`, `{}` nesting, `''` and `""` quoting with backslash escape
/// and no embedded newlines. Unterminated open delimiters at the end of
/// input are not an error.
pub fn split_delimiters<T: Text + ?Sized>(text: &T) -> SplitDelimiters<'_, 'static, T> {
    SplitDelimiters {
        text,
        delimiters: None,
        state: &[],
    }
}

impl<'t, 'd, T: Text + ?Sized> SplitDelimiters<'t, 'd, T> {
    pub fn delimiters(mut self, delimiters: &'d [(&'d T, Delimiter<T>)]) -> Self {
        self.delimiters = Some(delimiters);
        self
    }

    /// Prime the parser's stack with already-open markers, innermost
    /// last, for streaming multi-buffer parsing.
    pub fn state(mut self, open_markers: &'d [&'d T]) -> Self {
        self.state = open_markers;
        self
    }

    /// Run the split.
    #[allow(clippy::type_complexity)]
    pub fn triples(self) -> Result<Vec<(T::Owned, T::Owned, T::Owned)>, SplitError> {
        let table = match self.delimiters {
            Some(list) => {
                let owned: Vec<(T::Owned, Delimiter<T>)> = list
                    .iter()
                    .map(|(open, d)| (open.to_owned_text(), d.clone()))
                    .collect();
                compiled_table(&owned)?
            }
            None => compiled_table(T::default_delimiters())?,
        };
        run_machine(self.text, &table, self.state)
    }
}

#[allow(clippy::type_complexity)]
fn run_machine<T: Text + ?Sized>(
    text: &T,
    table: &Table<T>,
    primed: &[&T],
) -> Result<Vec<(T::Owned, T::Owned, T::Owned)>, SplitError> {
    let empty = T::Owned::default;

    let mut stack: Vec<(usize, Option<T::Owned>)> = Vec::new();
    let mut current = 0usize;
    let mut open: Option<T::Owned> = None;

    for marker in primed {
        let owned = marker.to_owned_text();
        match table.states[current].get::<T::Owned>(&owned) {
            Some(Action::Push(sid)) => {
                stack.push((current, open.take()));
                current = *sid;
                open = Some(owned);
            }
            _ => {
                return Err(SplitError::InvalidState(format!(
                    "{:?}",
                    marker.key_bytes()
                )))
            }
        }
    }

    let token_refs: Vec<&T> = table.all_tokens.iter().map(Borrow::borrow).collect();
    let separators = Separators::List(&token_refs);

    let mut triples = Vec::new();
    let mut buffer: T::Owned = empty();
    let mut escaped = false;
    let mut consumed = 0usize;

    let mut pairs = multisplit(text, separators)
        .separate(true)
        .pairs()?
        .into_iter();

    'outer: loop {
        let mut resplit = false;
        for (piece, mut token) in pairs.by_ref() {
            if piece.borrow().is_empty() && token.borrow().is_empty() {
                continue;
            }

            if escaped {
                escaped = false;
                if piece.borrow().is_empty() {
                    // The escape consumed the first unit of this token.
                    let tok: &T = token.borrow();
                    let head = tok.head_len();
                    T::push_onto(&mut buffer, tok.slice(0, head));
                    consumed += head;
                    if tok.len() == head {
                        continue;
                    }
                    resplit = true;
                    break;
                }
                // Otherwise the escaped unit opens `piece` and is
                // ordinary text anyway.
            }

            T::push_onto(&mut buffer, piece.borrow());
            consumed += piece.borrow().len();

            if token.borrow().is_empty() {
                continue;
            }

            let mut action = table.states[current].get::<T::Owned>(&token).cloned();

            if let Some(Action::TruncateTo(shorter)) = &action {
                token = shorter.clone();
                action = table.states[current].get::<T::Owned>(&token).cloned();
                resplit = true;
            }

            match action {
                Some(Action::Push(sid)) => {
                    triples.push((std::mem::take(&mut buffer), token.clone(), empty()));
                    consumed += token.borrow().len();
                    stack.push((current, open.take()));
                    current = sid;
                    open = Some(token);
                }
                Some(Action::Pop) => {
                    consumed += token.borrow().len();
                    triples.push((std::mem::take(&mut buffer), empty(), token));
                    let (restored_state, restored_open) = stack
                        .pop()
                        .expect("a close action implies a pushed state");
                    current = restored_state;
                    open = restored_open;
                }
                Some(Action::Escape) => {
                    T::push_onto(&mut buffer, token.borrow());
                    consumed += token.borrow().len();
                    escaped = true;
                }
                Some(Action::Flush1AndResplit) => {
                    let tok: &T = token.borrow();
                    let head = tok.head_len();
                    T::push_onto(&mut buffer, tok.slice(0, head));
                    consumed += head;
                    resplit = true;
                }
                Some(Action::Illegal) => {
                    return Err(SplitError::IllegalToken {
                        offset: consumed,
                        token: format!("{:?}", token.borrow().key_bytes()),
                    });
                }
                Some(Action::IllegalNewline) => {
                    return Err(SplitError::IllegalNewline {
                        offset: consumed,
                        delimiter: open
                            .as_ref()
                            .map(|o| format!("{:?}", o.borrow().key_bytes()))
                            .unwrap_or_default(),
                    });
                }
                Some(Action::TruncateTo(_)) => unreachable!("truncation resolved above"),
                None => {
                    // Not a token of the current state: plain body text.
                    T::push_onto(&mut buffer, token.borrow());
                    consumed += token.borrow().len();
                }
            }

            if resplit {
                break;
            }
        }

        if !resplit {
            break 'outer;
        }
        pairs = multisplit(text.slice(consumed, text.len()), separators)
            .separate(true)
            .pairs()?
            .into_iter();
    }

    if !buffer.borrow().is_empty() {
        if escaped {
            return Err(SplitError::TrailingEscape { offset: consumed });
        }
        triples.push((buffer, empty(), empty()));
    }

    Ok(triples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_default_delimiters() {
        let triples = split_delimiters("a(b[c]d)e").triples().unwrap();
        let expected: Vec<(String, String, String)> = vec![
            ("a".into(), "(".into(), "".into()),
            ("b".into(), "[".into(), "".into()),
            ("c".into(), "".into(), "]".into()),
            ("d".into(), "".into(), ")".into()),
            ("e".into(), "".into(), "".into()),
        ];
        assert_eq!(triples, expected);
    }

    #[test]
    fn quoting_delimiters_hide_nested_markers() {
        let triples = split_delimiters(r#"a"(["z"#).triples().unwrap();
        let expected: Vec<(String, String, String)> = vec![
            ("a".into(), "\"".into(), "".into()),
            ("([".into(), "".into(), "\"".into()),
            ("z".into(), "".into(), "".into()),
        ];
        assert_eq!(triples, expected);
    }

    #[test]
    fn close_without_open_is_illegal() {
        let err = split_delimiters("a]b").triples().unwrap_err();
        assert!(matches!(err, SplitError::IllegalToken { offset: 1, .. }));
    }

    #[test]
    fn newline_inside_quote_is_illegal() {
        let err = split_delimiters("'a\nb'").triples().unwrap_err();
        assert!(matches!(err, SplitError::IllegalNewline { .. }));
    }

    #[test]
    fn primed_state_resumes_nesting() {
        let triples = split_delimiters("c]d").state(&["[", "("]).triples();
        // "[" then "(" are open; "]" can't close "(".
        assert!(triples.is_err());

        let triples = split_delimiters("c]d").state(&["["]).triples().unwrap();
        let expected: Vec<(String, String, String)> = vec![
            ("c".into(), "".into(), "]".into()),
            ("d".into(), "".into(), "".into()),
        ];
        assert_eq!(triples, expected);
    }

    #[test]
    fn escaped_close_stays_in_quote() {
        let triples = split_delimiters(r#""a\"b""#).triples().unwrap();
        let expected: Vec<(String, String, String)> = vec![
            ("".into(), "\"".into(), "".into()),
            ("a\\\"b".into(), "".into(), "\"".into()),
        ];
        assert_eq!(triples, expected);
    }
}
