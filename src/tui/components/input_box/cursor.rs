//! Cursor position tracking and navigation for the InputBox.
//!
//! `CursorState` owns the cursor byte offset, the internal scroll offset and
//! the width seen at the last render. The text itself stays in `InputBox`,
//! so every method takes `buffer: &str` explicitly.

use std::ops::Range;

use ratatui::layout::Rect;

use super::text_wrap::{
    MAX_VISIBLE_LINES, TEXT_OFFSET_X, TEXT_OFFSET_Y, inner_width, layout_rows,
    prev_char_boundary,
};

pub(super) struct CursorState {
    /// Byte offset into the buffer (0..=buffer.len()), always on a char boundary
    pub pos: usize,
    /// First visible row when the content is taller than the box
    pub scroll_offset: u16,
    /// Area width from the last render (used for vertical movement)
    pub last_area_width: u16,
}

/// Row index holding `pos`. At a soft-wrap boundary the cursor belongs to
/// the continuation row.
fn row_of(rows: &[Range<usize>], pos: usize) -> usize {
    rows.iter()
        .rposition(|r| r.start <= pos)
        .unwrap_or(0)
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Back to the start (after the buffer is cleared).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// (row, column) of the cursor in wrapped coordinates.
    pub fn row_col(&self, buffer: &str, area_width: u16) -> (u16, u16) {
        let width = inner_width(area_width);
        let rows = layout_rows(buffer, width);
        let row = row_of(&rows, self.pos);
        let col = buffer[rows[row].start..self.pos].chars().count();
        (row as u16, (col as u16).min(width))
    }

    /// Move one wrapped row up (`down == false`) or down, keeping the column
    /// where possible. Returns `false` at the first/last row.
    pub fn move_vertically(&mut self, buffer: &str, down: bool, area_width: u16) -> bool {
        let width = inner_width(area_width);
        if width == 0 {
            return false;
        }

        let rows = layout_rows(buffer, width);
        let current = row_of(&rows, self.pos);
        let target = if down {
            if current + 1 >= rows.len() {
                return false;
            }
            current + 1
        } else {
            if current == 0 {
                return false;
            }
            current - 1
        };

        let column = buffer[rows[current].start..self.pos].chars().count();
        let target_row = &rows[target];
        let mut pos = buffer[target_row.clone()]
            .char_indices()
            .nth(column)
            .map(|(i, _)| target_row.start + i)
            .unwrap_or(target_row.end);

        // The end of a soft-wrapped row is the start of the next one; stay on
        // the target row by stepping back a character.
        let continues = rows
            .get(target + 1)
            .is_some_and(|next| next.start == target_row.end);
        if pos == target_row.end && continues && pos > target_row.start {
            pos = prev_char_boundary(buffer, pos);
        }

        self.pos = pos;
        true
    }

    /// Keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let total_rows = layout_rows(buffer, inner_width(area_width)).len() as u16;
        if total_rows <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let (row, _) = self.row_col(buffer, area_width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
        self.scroll_offset = self
            .scroll_offset
            .min(total_rows.saturating_sub(MAX_VISIBLE_LINES));
    }

    /// Terminal (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (row, col) = self.row_col(buffer, area.width);
        let visible_row = row.saturating_sub(self.scroll_offset);
        (
            area.x + TEXT_OFFSET_X + col,
            area.y + TEXT_OFFSET_Y + visible_row,
        )
    }
}
