//! The origin record backing provenance-tracking strings.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::split::separators;
use crate::split::text::Text;

/// The immutable source record a [`SourceString`](super::SourceString)
/// slices out of: the original text plus the metadata needed to compute
/// line and column numbers for any offset within it.
pub struct Origin {
    text: Box<str>,
    source: Option<String>,
    line_number: usize,
    column_number: usize,
    first_column_number: usize,
    tab_width: usize,
    /// End offsets of every linebreak in `text`, computed on first use
    /// and published atomically.
    linebreak_offsets: OnceCell<Vec<usize>>,
}

impl Origin {
    pub(crate) fn new(
        text: &str,
        source: Option<String>,
        line_number: usize,
        column_number: usize,
        first_column_number: usize,
        tab_width: usize,
    ) -> Arc<Origin> {
        Arc::new(Origin {
            text: text.into(),
            source,
            line_number,
            column_number,
            first_column_number,
            tab_width,
            linebreak_offsets: OnceCell::new(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn column_number(&self) -> usize {
        self.column_number
    }

    pub fn first_column_number(&self) -> usize {
        self.first_column_number
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    fn linebreak_offsets(&self) -> &[usize] {
        self.linebreak_offsets.get_or_init(|| {
            let linebreaks: Vec<String> = separators::STR_LINEBREAKS
                .iter()
                .map(|s| s.to_string())
                .collect();
            let re = separators::compiled::<str>(&linebreaks, true, false);
            <str as Text>::find_spans(&re, &self.text)
                .into_iter()
                .map(|(_, end)| end)
                .collect()
        })
    }

    /// The (line, column) of the character at `offset`, honoring tab
    /// stops and CR-LF-as-one-break.
    pub(crate) fn line_and_column(&self, offset: usize) -> (usize, usize) {
        let offsets = self.linebreak_offsets();
        // Count the linebreaks that end at or before this offset.
        let line_index = offsets.partition_point(|&end| end <= offset);
        let line_number = self.line_number + line_index;
        let line_start = if line_index == 0 {
            0
        } else {
            offsets[line_index - 1]
        };

        let mut column = if line_index == 0 {
            self.column_number
        } else {
            self.first_column_number
        };
        for c in self.text[line_start..offset].chars() {
            if c == '\t' {
                // Tabs are measured from the first column: with a first
                // column of 1 and width 8, stops land at 9, 17, 25...
                let remainder = (column - self.first_column_number) % self.tab_width;
                column += self.tab_width - remainder;
            } else {
                column += 1;
            }
        }
        (line_number, column)
    }
}

impl std::fmt::Debug for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Origin")
            .field("text", &self.text)
            .field("source", &self.source)
            .field("line_number", &self.line_number)
            .field("column_number", &self.column_number)
            .finish()
    }
}

/// A reference to a range of characters in an [`Origin`]. A
/// [`SourceString`](super::SourceString) is mainly a sequence of these.
#[derive(Clone, Debug)]
pub(crate) struct Span {
    pub(crate) origin: Arc<Origin>,
    pub(crate) start: usize,
    pub(crate) stop: usize,
}

impl Span {
    pub(crate) fn text(&self) -> &str {
        &self.origin.text()[self.start..self.stop]
    }

    pub(crate) fn len(&self) -> usize {
        self.stop - self.start
    }
}
