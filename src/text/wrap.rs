//! Word wrapping and column merging.

use serde::Serialize;

use crate::SplitError;

/// Combine pre-split words into lines no wider than `margin`.
///
/// A single `"\n"` element is a line break; two in a row make a
/// paragraph break. When `two_spaces` is true, a word ending in
/// sentence-ending punctuation is followed by two spaces. Elements are
/// never modified, so whitespace-preserving elements (code lines from
/// [`split_text_with_code`](crate::split_text_with_code)) pass through
/// intact.
pub fn wrap_words<I, S>(words: I, margin: usize, two_spaces: bool) -> Result<String, SplitError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut col = 0usize;
    let mut last_word = String::new();
    let mut text = String::new();
    let mut first_word = true;

    for word in words {
        let word = word.as_ref();
        first_word = false;

        if !word.is_empty() && word.chars().all(char::is_whitespace) {
            last_word = word.to_string();
            col = 0;
            text.push_str(word);
            continue;
        }

        let length = word.chars().count();
        let (space, space_len) = if two_spaces
            && (last_word.ends_with('.') || last_word.ends_with('?') || last_word.ends_with('!'))
        {
            ("  ", 2)
        } else {
            (" ", 1)
        };

        if length + space_len + col > margin {
            if col > 0 {
                text.push('\n');
                col = 0;
            }
        } else if col > 0 {
            text.push_str(space);
            col += space_len;
        }

        text.push_str(word);
        col += length;
        last_word = word.to_string();
    }

    if first_word {
        return Err(SplitError::NoWords);
    }
    Ok(text)
}

/// Options for [`split_text_with_code`].
#[derive(Debug, Clone)]
pub struct SplitTextOptions {
    pub tab_width: usize,
    /// Preserve the whitespace of paragraphs indented by at least
    /// `code_indent` columns.
    pub allow_code: bool,
    pub code_indent: usize,
    pub convert_tabs_to_spaces: bool,
}

impl Default for SplitTextOptions {
    fn default() -> Self {
        SplitTextOptions {
            tab_width: 8,
            allow_code: true,
            code_indent: 4,
            convert_tabs_to_spaces: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WrapState {
    ParagraphStart,
    LineStart,
    TextLineStart,
    InTextLine,
    CodeLineStart,
    InCodeLine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Paragraph {
    Text,
    Code,
}

/// Splits text into words suitable for [`wrap_words`]: ordinary
/// paragraphs break into individual words, while paragraphs indented by
/// at least `code_indent` keep their internal whitespace and line
/// structure.
struct ColumnWrapperSplitter {
    options: SplitTextOptions,
    words: Vec<String>,
    leading: String,
    word: String,
    code: Vec<String>,
    previous_paragraph: Option<Paragraph>,
    state: WrapState,
    col: usize,
}

impl ColumnWrapperSplitter {
    fn new(options: SplitTextOptions) -> ColumnWrapperSplitter {
        ColumnWrapperSplitter {
            options,
            words: Vec::new(),
            leading: String::new(),
            word: String::new(),
            code: Vec::new(),
            previous_paragraph: None,
            state: WrapState::ParagraphStart,
            col: 0,
        }
    }

    fn emit(&mut self, word: &str) {
        self.words.push(word.to_string());
    }

    /// Aggregate characters into (leading-whitespace, word) calls to
    /// `feed`: a "word" is either a run of non-whitespace or a single
    /// newline; all other whitespace arrives as `leading`.
    fn write(&mut self, c: char) {
        if !c.is_whitespace() {
            self.word.push(c);
            return;
        }

        let pending_word = if self.word.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.word))
        };

        if c == '\n' {
            match pending_word {
                Some(word) => {
                    let leading = std::mem::take(&mut self.leading);
                    self.feed(&leading, &word);
                    self.feed("", "\n");
                }
                None => {
                    let leading = std::mem::take(&mut self.leading);
                    self.feed(&leading, "\n");
                }
            }
        } else {
            if let Some(word) = pending_word {
                let leading = std::mem::take(&mut self.leading);
                self.feed(&leading, &word);
            }
            self.leading.push(c);
        }
    }

    fn close(&mut self) {
        if !self.word.is_empty() {
            let leading = std::mem::take(&mut self.leading);
            let word = std::mem::take(&mut self.word);
            self.feed(&leading, &word);
        }
    }

    fn feed(&mut self, leading: &str, word: &str) {
        let mut leading = leading;
        let mut state = self.state;
        loop {
            match state {
                WrapState::ParagraphStart => {
                    if word == "\n" {
                        self.state = state;
                        return;
                    }
                    if self.previous_paragraph.is_some() {
                        self.words.push("\n\n".to_string());
                        self.previous_paragraph = None;
                    }
                    state = WrapState::LineStart;
                }
                WrapState::LineStart => {
                    if word == "\n" {
                        if self.previous_paragraph == Some(Paragraph::Code) {
                            // Might still be inside a code block; hold
                            // the blank line.
                            self.code.push("\n".to_string());
                            self.state = state;
                            return;
                        }
                        self.state = WrapState::ParagraphStart;
                        return;
                    }
                    if self.options.allow_code {
                        let mut col = 0;
                        for c in leading.chars() {
                            if c == '\t' {
                                col += self.options.tab_width - col % self.options.tab_width;
                            } else {
                                col += 1;
                            }
                        }
                        if col >= self.options.code_indent {
                            if self.previous_paragraph == Some(Paragraph::Text) {
                                self.words.push("\n\n".to_string());
                                self.code.clear();
                            } else if !self.code.is_empty() {
                                for _ in &self.code {
                                    self.words.push("\n".to_string());
                                }
                                self.code.clear();
                            }
                            state = WrapState::CodeLineStart;
                            continue;
                        }
                    }
                    if self.previous_paragraph == Some(Paragraph::Code) {
                        self.words.push("\n\n".to_string());
                        self.code.clear();
                    }
                    state = WrapState::TextLineStart;
                }
                WrapState::TextLineStart => {
                    self.previous_paragraph = Some(Paragraph::Text);
                    state = WrapState::InTextLine;
                }
                WrapState::InTextLine => {
                    if word == "\n" {
                        self.state = WrapState::LineStart;
                        return;
                    }
                    self.emit(word);
                    self.state = state;
                    return;
                }
                WrapState::CodeLineStart => {
                    self.previous_paragraph = Some(Paragraph::Code);
                    self.col = 0;
                    state = WrapState::InCodeLine;
                }
                WrapState::InCodeLine => {
                    if word == "\n" {
                        let code_line: String = self.code.concat();
                        self.emit(&code_line);
                        self.code.clear();
                        self.state = WrapState::LineStart;
                        // Re-dispatch the newline from LineStart with no
                        // leading whitespace.
                        leading = "";
                        state = WrapState::LineStart;
                        continue;
                    }
                    for c in leading.chars() {
                        if c == '\t' {
                            let delta = self.options.tab_width - self.col % self.options.tab_width;
                            self.col += delta;
                            if self.options.convert_tabs_to_spaces {
                                self.code.push(" ".repeat(delta));
                            } else {
                                self.code.push("\t".to_string());
                            }
                        } else {
                            self.col += 1;
                            self.code.push(c.to_string());
                        }
                    }
                    self.code.push(word.to_string());
                    self.col += word.chars().count();
                    self.state = state;
                    return;
                }
            }
        }
    }
}

/// Split `s` into words for [`wrap_words`], preserving the whitespace
/// of code paragraphs. An empty input yields a single empty string.
pub fn split_text_with_code(s: &str, options: SplitTextOptions) -> Vec<String> {
    let mut splitter = ColumnWrapperSplitter::new(options);
    for c in s.chars() {
        splitter.write(c);
    }
    splitter.close();
    if splitter.words.is_empty() {
        return vec![String::new()];
    }
    splitter.words
}

/// How [`merge_columns`] handles a column line wider than the column's
/// max width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverflowStrategy {
    /// Fail with [`SplitError::ColumnOverflow`].
    Raise,
    /// Intrude into the subsequent columns on the overflowed lines.
    IntrudeAll,
    /// Delay all subsequent columns until after the last overflowed
    /// line.
    DelayAll,
}

/// Options for [`merge_columns`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Printed between columns; a single space by default.
    pub column_separator: Option<String>,
    pub overflow_strategy: OverflowStrategy,
    /// Extra overflow context lines before/after the overflowed lines.
    pub overflow_before: usize,
    pub overflow_after: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            column_separator: None,
            overflow_strategy: OverflowStrategy::Raise,
            overflow_before: 0,
            overflow_after: 0,
        }
    }
}

/// Merge column tuples `(text, min_width, max_width)` into a single
/// string, one column per tuple, lines joined left to right.
///
/// Lines are not wrapped; a line wider than its column's `max_width` is
/// handled per the overflow strategy.
pub fn merge_columns(
    columns: &[(&str, usize, usize)],
    options: MergeOptions,
) -> Result<String, SplitError> {
    let separator = options.column_separator.as_deref().unwrap_or(" ");
    let delay_all = options.overflow_strategy == OverflowStrategy::DelayAll;
    let raise = options.overflow_strategy == OverflowStrategy::Raise;

    let mut rendered_columns: Vec<Vec<(String, bool)>> = Vec::with_capacity(columns.len());
    let mut empty_columns: Vec<String> = Vec::with_capacity(columns.len());

    for (column_number, (text, _min_width, max_width)) in columns.iter().enumerate() {
        empty_columns.push(" ".repeat(*max_width));

        let mut lines: Vec<String> = text
            .trim_end()
            .split('\n')
            .map(|line| line.trim_end().to_string())
            .collect();

        // Pass 1: find the overflowed line ranges.
        let mut overflows: Vec<(usize, usize)> = Vec::new();
        let mut in_overflow = false;
        let mut overflow_start = 0usize;
        let mut last_line_number = 0usize;
        for (line_number, line) in lines.iter().enumerate() {
            last_line_number = line_number;
            let width = line.chars().count();
            let overflowed = width > *max_width;
            if overflowed && !in_overflow {
                if raise {
                    return Err(SplitError::ColumnOverflow {
                        column: column_number,
                        width,
                        limit: *max_width,
                    });
                }
                overflow_start = line_number.saturating_sub(options.overflow_before);
                in_overflow = true;
            } else if !overflowed && in_overflow {
                push_overflow(
                    &mut overflows,
                    overflow_start,
                    line_number - 1 + options.overflow_after,
                );
                in_overflow = false;
            }
        }
        if in_overflow {
            push_overflow(
                &mut overflows,
                overflow_start,
                last_line_number + options.overflow_after,
            );
            for _ in 0..options.overflow_after {
                lines.push(String::new());
            }
        }
        if delay_all {
            if let Some(&(_, end)) = overflows.last() {
                overflows.clear();
                overflows.push((0, end));
            }
        }

        // Pass 2: pad the non-overflow lines and tag each line.
        let mut padded: Vec<(String, bool)> = Vec::with_capacity(lines.len());
        let mut windows = overflows.into_iter().peekable();
        let mut current: Option<(usize, usize)> = windows.next();
        for (line_number, line) in lines.into_iter().enumerate() {
            while let Some((_, end)) = current {
                if line_number > end {
                    current = windows.next();
                } else {
                    break;
                }
            }
            let in_overflow = match current {
                Some((start, end)) => line_number >= start && line_number <= end,
                None => false,
            };
            let line = if in_overflow {
                line
            } else {
                let width = line.chars().count();
                if width < *max_width {
                    format!("{line}{}", " ".repeat(max_width - width))
                } else {
                    line
                }
            };
            padded.push((line, in_overflow));
        }
        rendered_columns.push(padded);
    }

    // Assemble rows, stopping a row early when a column intrudes.
    let mut iterators: Vec<std::vec::IntoIter<(String, bool)>> = rendered_columns
        .into_iter()
        .map(Vec::into_iter)
        .collect();
    let mut out_lines: Vec<String> = Vec::new();
    loop {
        let mut row = String::new();
        let mut exhausted = true;
        for (i, (column_iterator, empty_column)) in
            iterators.iter_mut().zip(&empty_columns).enumerate()
        {
            if i > 0 {
                row.push_str(separator);
            }
            let mut intruded = false;
            match column_iterator.next() {
                Some((column_text, in_overflow)) => {
                    exhausted = false;
                    row.push_str(&column_text);
                    intruded = in_overflow;
                }
                None => row.push_str(empty_column),
            }
            if intruded {
                break;
            }
        }
        if exhausted {
            break;
        }
        out_lines.push(row.trim_end().to_string());
    }

    Ok(out_lines.join("\n").trim_end().to_string())
}

fn push_overflow(overflows: &mut Vec<(usize, usize)>, start: usize, end: usize) {
    // Merge with the previous window when the context lines touch.
    if let Some(&(previous_start, previous_end)) = overflows.last() {
        if previous_end + 1 >= start {
            overflows.pop();
            overflows.push((previous_start, end));
            return;
        }
    }
    overflows.push((start, end));
}
