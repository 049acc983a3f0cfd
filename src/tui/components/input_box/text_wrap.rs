//! Wrapping helpers and dimensions for the input box.
//!
//! Rows are computed once as byte ranges into the buffer, so rendering,
//! height and cursor placement all agree on where each row starts.

use std::ops::Range;

use textwrap::WordSeparator;
use textwrap::core::break_words;
use textwrap::wrap_algorithms::wrap_first_fit;

/// Height of one text row, in auto-resize units.
pub(super) const LINE_HEIGHT_UNITS: u16 = 20;
/// The box grows with its content up to this height, then scrolls internally.
pub(super) const MAX_INPUT_HEIGHT_UNITS: u16 = 120;
/// Maximum visible content lines before internal scrolling kicks in.
pub(super) const MAX_VISIBLE_LINES: u16 = MAX_INPUT_HEIGHT_UNITS / LINE_HEIGHT_UNITS;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from the area's left edge to the first text column (border + padding)
pub(super) const TEXT_OFFSET_X: u16 = 2;
/// Offset from the area's top edge to the first text row (border)
pub(super) const TEXT_OFFSET_Y: u16 = 1;

/// Text width inside borders and padding; 0 if the area is too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Split `text` into display rows of at most `width` columns.
///
/// Every logical line yields at least one row (possibly empty). Long words
/// are broken. A row's range includes its trailing spaces but never the
/// newline that ends a logical line.
pub(super) fn layout_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let words = break_words(WordSeparator::AsciiSpace.find_words(line), width);
        let wrapped = wrap_first_fit(&words, &[width as f64]);

        // An empty line already comes back as one empty row
        if wrapped.is_empty() {
            rows.push(line_start..line_start);
        }
        let mut offset = line_start;
        for row in wrapped {
            let start = offset;
            offset += row
                .iter()
                .map(|w| w.word.len() + w.whitespace.len())
                .sum::<usize>();
            rows.push(start..offset);
        }

        line_start += line.len() + 1;
    }

    rows
}

/// Wrapped row count for `text` at `width`.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    layout_rows(text, width).len().min(usize::from(u16::MAX)) as u16
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
