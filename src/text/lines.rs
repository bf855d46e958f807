//! The lines iterator protocol and its modifier adapters.
//!
//! [`lines`] yields `(LineInfo, String)` pairs; the `lines_*` functions
//! are composable adapters over that stream. Errors travel through the
//! stream as `Err` items, so adapters chain freely.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;

use crate::split::multisplit::multisplit;
use crate::split::quoted::split_quoted_strings;
use crate::split::separators;
use crate::split::text::{Separators, Text};
use crate::SplitError;

/// Metadata for one line of a lines iterator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineInfo {
    /// The original unmodified line, including its terminator.
    pub line: String,
    pub line_number: usize,
    /// Column where the (possibly clipped) line text now starts.
    pub column_number: usize,
    /// Text clipped from the beginning of the line.
    pub leading: String,
    /// Text clipped from the end of the line (not counting `end`).
    pub trailing: String,
    /// The linebreak that terminated this line, if any.
    pub end: String,
    /// Indent level, once measured (see [`lines_strip_indent`]).
    pub indent: usize,
    /// Span of the match set by [`lines_grep`], if any.
    pub match_span: Option<(usize, usize)>,
    /// Tab width of the owning stream.
    pub tab_width: usize,
    /// The stream's starting column for every line.
    pub stream_column: usize,
}

/// How much to clip: a literal prefix/suffix, or a character count.
#[derive(Debug, Clone, Copy)]
pub enum Clip<'a> {
    Text(&'a str),
    Count(usize),
}

impl LineInfo {
    /// Expand tabs using the stream's tab width.
    pub fn detab(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut column = 0;
        for c in s.chars() {
            match c {
                '\t' => {
                    let spaces = self.tab_width - column % self.tab_width;
                    out.extend(std::iter::repeat(' ').take(spaces));
                    column += spaces;
                }
                '\n' | '\r' => {
                    out.push(c);
                    column = 0;
                }
                _ => {
                    out.push(c);
                    column += 1;
                }
            }
        }
        out
    }

    /// Clip a leading substring from `line`, accumulating it into
    /// `leading` and advancing `column_number` by its detabbed width.
    /// Returns the clipped line.
    pub fn clip_leading(&mut self, line: &str, clip: Clip<'_>) -> String {
        let prefix = match clip {
            Clip::Text(text) => {
                debug_assert!(line.starts_with(text));
                text
            }
            Clip::Count(count) => {
                let at = line
                    .char_indices()
                    .nth(count)
                    .map_or(line.len(), |(i, _)| i);
                &line[..at]
            }
        };
        self.leading.push_str(prefix);
        let detabbed = self.detab(prefix);
        self.column_number += detabbed.chars().count();
        line[prefix.len()..].to_string()
    }

    /// Clip a trailing substring from `line`, accumulating it onto the
    /// front of `trailing`. Returns the clipped line.
    pub fn clip_trailing(&mut self, line: &str, clip: Clip<'_>) -> String {
        let suffix = match clip {
            Clip::Text(text) => {
                debug_assert!(line.ends_with(text));
                text
            }
            Clip::Count(count) => {
                let total = line.chars().count();
                let at = line
                    .char_indices()
                    .nth(total.saturating_sub(count))
                    .map_or(line.len(), |(i, _)| i);
                &line[at..]
            }
        };
        self.trailing = format!("{suffix}{}", self.trailing);
        line[..line.len() - suffix.len()].to_string()
    }
}

pub type Line = (LineInfo, String);
pub type LineResult = Result<Line, SplitError>;

/// Options for [`lines`].
#[derive(Debug, Clone)]
pub struct LinesOptions<'a> {
    /// Split at these separators instead of the linebreak table.
    pub separators: Option<Separators<'a, str>>,
    pub line_number: usize,
    pub column_number: usize,
    pub tab_width: usize,
}

impl Default for LinesOptions<'_> {
    fn default() -> Self {
        LinesOptions {
            separators: None,
            line_number: 1,
            column_number: 1,
            tab_width: 8,
        }
    }
}

/// A lines iterator: splits `s` into lines and yields
/// `(LineInfo, line)` pairs, composable with the `lines_*` modifiers.
pub fn lines(s: &str, options: LinesOptions<'_>) -> Result<Lines, SplitError> {
    let separators = options
        .separators
        .unwrap_or(Separators::List(separators::STR_LINEBREAKS));
    let pairs = multisplit(s, separators).separate(true).pairs()?;
    Ok(Lines {
        pairs: pairs.into_iter(),
        line_number: options.line_number,
        column_number: options.column_number,
        tab_width: options.tab_width,
    })
}

pub struct Lines {
    pairs: std::vec::IntoIter<(String, String)>,
    line_number: usize,
    column_number: usize,
    tab_width: usize,
}

impl Iterator for Lines {
    type Item = LineResult;

    fn next(&mut self) -> Option<LineResult> {
        let (line, end) = self.pairs.next()?;
        let raw = format!("{line}{end}");
        let info = LineInfo {
            line: raw,
            line_number: self.line_number,
            column_number: self.column_number,
            leading: String::new(),
            trailing: String::new(),
            end,
            indent: 0,
            match_span: None,
            tab_width: self.tab_width,
            stream_column: self.column_number,
        };
        self.line_number += 1;
        Some(Ok((info, line)))
    }
}

fn strip_ends(
    line: &str,
    separators: Option<&[String]>,
    left: bool,
) -> Result<(usize, usize), SplitError> {
    match separators {
        None => {
            let stop = line
                .char_indices()
                .rev()
                .find(|(_, c)| !c.is_whitespace())
                .map_or(0, |(i, c)| i + c.len_utf8());
            let start = if left {
                line.char_indices()
                    .find(|(_, c)| !c.is_whitespace())
                    .map_or(stop, |(i, _)| i.min(stop))
            } else {
                0
            };
            Ok((start, stop))
        }
        Some(seps) => {
            let refs: Vec<&str> = seps.iter().map(String::as_str).collect();
            let stripped =
                crate::multistrip(line, Separators::List(&refs), left, true)?;
            let start = if left {
                match line.find(&stripped) {
                    Some(found) if !stripped.is_empty() => found,
                    _ => 0,
                }
            } else {
                0
            };
            Ok((start, start + stripped.len()))
        }
    }
}

/// Strip trailing separators (whitespace by default) from every line,
/// clipping them into `info.trailing`.
pub fn lines_rstrip<I>(
    li: I,
    separators: Option<Vec<String>>,
) -> impl Iterator<Item = LineResult>
where
    I: Iterator<Item = LineResult>,
{
    li.map(move |item| {
        let (mut info, line) = item?;
        let (_, stop) = strip_ends(&line, separators.as_deref(), false)?;
        let line = if stop < line.len() {
            info.clip_trailing(&line, Clip::Text(&line[stop..]))
        } else {
            line
        };
        Ok((info, line))
    })
}

/// Strip leading and trailing separators (whitespace by default),
/// clipping them into `info.leading` / `info.trailing`. A line that
/// strips to nothing is clipped entirely to `trailing`.
pub fn lines_strip<I>(
    li: I,
    separators: Option<Vec<String>>,
) -> impl Iterator<Item = LineResult>
where
    I: Iterator<Item = LineResult>,
{
    li.map(move |item| {
        let (mut info, line) = item?;
        if line.is_empty() {
            return Ok((info, line));
        }
        let (start, stop) = strip_ends(&line, separators.as_deref(), true)?;
        if stop == 0 || start >= stop {
            let line = info.clip_trailing(&line, Clip::Text(&line));
            return Ok((info, line));
        }
        let mut line = line;
        if start > 0 {
            let prefix = line[..start].to_string();
            line = info.clip_leading(&line, Clip::Text(&prefix));
        }
        let keep = stop - start;
        if keep < line.len() {
            let suffix = line[keep..].to_string();
            line = info.clip_trailing(&line, Clip::Text(&suffix));
        }
        Ok((info, line))
    })
}

/// Filter out lines whose first non-whitespace text is one of the
/// comment markers.
pub fn lines_filter_comment_lines<I>(
    li: I,
    comment_markers: &[&str],
) -> Result<impl Iterator<Item = LineResult>, SplitError>
where
    I: Iterator<Item = LineResult>,
{
    let markers: Vec<String> = comment_markers.iter().map(|m| m.to_string()).collect();
    if markers.is_empty() || markers.iter().any(String::is_empty) {
        return Err(SplitError::EmptySeparators);
    }
    let pattern = separators::compiled::<str>(&markers, false, false);
    Ok(li.filter(move |item| match item {
        Err(_) => true,
        Ok((_, line)) => {
            let trimmed = line.trim_start();
            !matches!(
                <str as Text>::find_at(&pattern, trimmed, 0),
                Some((0, _))
            )
        }
    }))
}

/// Only yield lines containing `needle` (or, inverted, lines that
/// don't).
pub fn lines_containing<I>(li: I, needle: String, invert: bool) -> impl Iterator<Item = LineResult>
where
    I: Iterator<Item = LineResult>,
{
    li.filter(move |item| match item {
        Err(_) => true,
        Ok((_, line)) => line.contains(&needle) != invert,
    })
}

/// Only yield lines matching `pattern`, recording the match span in
/// `info.match_span`. Inverted, yields non-matching lines with the span
/// cleared.
pub fn lines_grep<I>(
    li: I,
    pattern: &str,
    invert: bool,
) -> Result<impl Iterator<Item = LineResult>, SplitError>
where
    I: Iterator<Item = LineResult>,
{
    let re = regex::Regex::new(pattern).map_err(|e| SplitError::Pattern(e.to_string()))?;
    Ok(li.filter_map(move |item| match item {
        Err(e) => Some(Err(e)),
        Ok((mut info, line)) => {
            let found = re.find(&line).map(|m| (m.start(), m.end()));
            match (found, invert) {
                (Some(span), false) => {
                    info.match_span = Some(span);
                    Some(Ok((info, line)))
                }
                (None, true) => {
                    info.match_span = None;
                    Some(Ok((info, line)))
                }
                _ => None,
            }
        }
    }))
}

/// Sort all lines lexicographically (all input is consumed up front).
pub fn lines_sort<I>(li: I, reverse: bool) -> impl Iterator<Item = LineResult>
where
    I: Iterator<Item = LineResult>,
{
    let mut collected: Vec<LineResult> = li.collect();
    collected.sort_by(|a, b| {
        let key_a = a.as_ref().map(|(_, line)| line.clone()).unwrap_or_default();
        let key_b = b.as_ref().map(|(_, line)| line.clone()).unwrap_or_default();
        if reverse {
            key_b.cmp(&key_a)
        } else {
            key_a.cmp(&key_b)
        }
    });
    collected.into_iter()
}

/// Convert tabs to spaces using the stream's tab width.
pub fn lines_convert_tabs_to_spaces<I>(li: I) -> impl Iterator<Item = LineResult>
where
    I: Iterator<Item = LineResult>,
{
    li.map(|item| {
        let (info, line) = item?;
        let detabbed = info.detab(&line);
        Ok((info, detabbed))
    })
}

/// Filter out empty lines, preserving line numbers.
pub fn lines_filter_empty_lines<I>(li: I) -> impl Iterator<Item = LineResult>
where
    I: Iterator<Item = LineResult>,
{
    li.filter(|item| match item {
        Err(_) => true,
        Ok((_, line)) => !line.is_empty(),
    })
}

/// Strip line comments, optionally honoring quoted strings so markers
/// inside quotes don't count. Multiline quotes may span lines; the
/// cross-line quote state is tracked internally.
pub fn lines_strip_comments<I>(
    li: I,
    comment_markers: &[&str],
    quotes: &[&str],
    multiline_quotes: &[&str],
    escape: &str,
) -> Result<LinesStripComments<I>, SplitError>
where
    I: Iterator<Item = LineResult>,
{
    let markers: Vec<String> = comment_markers.iter().map(|m| m.to_string()).collect();
    if markers.is_empty() || markers.iter().any(String::is_empty) {
        return Err(SplitError::EmptySeparators);
    }
    let pattern = separators::compiled::<str>(&markers, true, false);
    Ok(LinesStripComments {
        inner: li,
        pattern,
        quotes: quotes.iter().map(|q| q.to_string()).collect(),
        multiline_quotes: multiline_quotes.iter().map(|q| q.to_string()).collect(),
        escape: escape.to_string(),
        state: None,
        failed: false,
    })
}

pub struct LinesStripComments<I> {
    inner: I,
    pattern: Arc<regex::Regex>,
    quotes: Vec<String>,
    multiline_quotes: Vec<String>,
    escape: String,
    /// The still-open multiline quote marker, if any.
    state: Option<String>,
    failed: bool,
}

impl<I> LinesStripComments<I> {
    fn strip_line(&mut self, info: &mut LineInfo, line: String) -> Result<String, SplitError> {
        if self.quotes.is_empty() && self.multiline_quotes.is_empty() {
            if let Some((at, _)) = <str as Text>::find_at(&self.pattern, &line, 0) {
                let suffix = line[at..].to_string();
                return Ok(info.clip_trailing(&line, Clip::Text(&suffix)));
            }
            return Ok(line);
        }

        let resuming = self.state.clone();
        let quote_refs: Vec<&str> = self.quotes.iter().map(String::as_str).collect();
        let multiline_refs: Vec<&str> =
            self.multiline_quotes.iter().map(String::as_str).collect();
        let mut builder = split_quoted_strings(line.as_str())
            .quotes(&quote_refs)
            .multiline_quotes(&multiline_refs)
            .escape(self.escape.as_str());
        if let Some(marker) = &resuming {
            builder = builder.state(marker.as_str());
        }
        let triples = builder.triples()?;

        let mut consumed = 0usize;
        let mut open_marker: Option<String> = None;
        let mut resumed = resuming;

        for (leading_quote, body, trailing_quote) in &triples {
            let segment_start = consumed + leading_quote.len();

            if !leading_quote.is_empty() {
                // A quoted segment: comment markers inside are literal.
                open_marker = if trailing_quote.is_empty() {
                    Some(leading_quote.clone())
                } else {
                    None
                };
                consumed = segment_start + body.len() + trailing_quote.len();
                continue;
            }

            if resumed.is_some() {
                // Still inside a quote opened on a previous line.
                let marker = resumed.take();
                if trailing_quote.is_empty() {
                    resumed = marker;
                }
                consumed = segment_start + body.len() + trailing_quote.len();
                continue;
            }

            if let Some((at, _)) = <str as Text>::find_at(&self.pattern, body, 0) {
                let cut = segment_start + at;
                let suffix = line[cut..].to_string();
                self.state = None;
                return Ok(info.clip_trailing(&line, Clip::Text(&suffix)));
            }
            consumed = segment_start + body.len() + trailing_quote.len();
        }

        if let Some(marker) = resumed {
            // The whole line stayed inside the earlier quote.
            if !self.multiline_quotes.contains(&marker) {
                return Err(SplitError::UnterminatedQuote { offset: consumed });
            }
            self.state = Some(marker);
            return Ok(line);
        }

        match open_marker {
            Some(marker) => {
                if !self.multiline_quotes.contains(&marker) {
                    return Err(SplitError::UnterminatedQuote { offset: consumed });
                }
                self.state = Some(marker);
            }
            None => self.state = None,
        }
        Ok(line)
    }
}

impl<I> Iterator for LinesStripComments<I>
where
    I: Iterator<Item = LineResult>,
{
    type Item = LineResult;

    fn next(&mut self) -> Option<LineResult> {
        if self.failed {
            return None;
        }
        match self.inner.next() {
            Some(Ok((mut info, line))) => match self.strip_line(&mut info, line) {
                Ok(line) => Some(Ok((info, line))),
                Err(e) => {
                    self.failed = true;
                    Some(Err(e))
                }
            },
            Some(Err(e)) => Some(Err(e)),
            None => {
                if let Some(_open) = self.state.take() {
                    self.failed = true;
                    return Some(Err(SplitError::UnterminatedQuote { offset: 0 }));
                }
                None
            }
        }
    }
}

/// Strip leading whitespace and track the indent level in
/// `info.indent`. Text can only dedent to a previously seen indent;
/// anything else is an error. Blank lines take the indent of the next
/// non-blank line (or 0 at the end of input).
pub fn lines_strip_indent<I>(li: I) -> LinesStripIndent<I>
where
    I: Iterator<Item = LineResult>,
{
    LinesStripIndent {
        inner: li,
        indent: 0,
        leadings: Vec::new(),
        blanks: Vec::new(),
        pending: VecDeque::new(),
        failed: false,
        done: false,
    }
}

pub struct LinesStripIndent<I> {
    inner: I,
    indent: usize,
    /// Column numbers of the active indents, innermost last.
    leadings: Vec<usize>,
    blanks: Vec<Line>,
    pending: VecDeque<Line>,
    failed: bool,
    done: bool,
}

impl<I> Iterator for LinesStripIndent<I>
where
    I: Iterator<Item = LineResult>,
{
    type Item = LineResult;

    fn next(&mut self) -> Option<LineResult> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if self.failed {
                return None;
            }
            if self.done {
                return None;
            }
            match self.inner.next() {
                None => {
                    self.done = true;
                    for (mut info, line) in self.blanks.drain(..) {
                        info.indent = 0;
                        self.pending.push_back((info, line));
                    }
                    continue;
                }
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok((mut info, line))) => {
                    let stripped = line.trim_start();
                    if stripped.is_empty() {
                        // 100% whitespace clips to trailing, so the
                        // column number stays sensible.
                        let line = info.clip_trailing(&line, Clip::Text(&line));
                        self.blanks.push((info, line));
                        continue;
                    }

                    let clipped = line.len() - stripped.len();
                    let line = if clipped > 0 {
                        let prefix = line[..clipped].to_string();
                        info.clip_leading(&line, Clip::Text(&prefix))
                    } else {
                        line
                    };
                    let column = info.column_number;

                    let mut new_indent = false;
                    if column == info.stream_column {
                        self.indent = 0;
                        self.leadings.clear();
                    } else if self.leadings.is_empty() {
                        new_indent = true;
                    } else if *self.leadings.last().expect("non-empty") == column {
                        new_indent = false;
                    } else if column > *self.leadings.last().expect("non-empty") {
                        new_indent = true;
                    } else {
                        // Dedenting: must land on an indent we've seen.
                        self.leadings.pop();
                        self.indent -= 1;
                        while let Some(&level) = self.leadings.last() {
                            if level >= column {
                                if level > column {
                                    self.leadings.clear();
                                }
                                break;
                            }
                            self.leadings.pop();
                            self.indent -= 1;
                        }
                        if self.leadings.is_empty() {
                            self.failed = true;
                            return Some(Err(SplitError::IllegalDedent {
                                line: info.line_number,
                                column,
                            }));
                        }
                    }

                    if new_indent {
                        self.leadings.push(column);
                        self.indent += 1;
                    }

                    for (mut blank_info, blank_line) in self.blanks.drain(..) {
                        blank_info.indent = self.indent;
                        self.pending.push_back((blank_info, blank_line));
                    }
                    info.indent = self.indent;
                    self.pending.push_back((info, line));
                }
            }
        }
    }
}
