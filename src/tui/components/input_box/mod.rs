//! # InputBox Component
//!
//! Multi-line message composer.
//!
//! ## Responsibilities
//!
//! - Capture and edit text (chars, paste, backspace/delete, cursor movement)
//! - Insert newlines (Shift+Enter) and emit submissions (Enter)
//! - Grow with its content up to `MAX_VISIBLE_LINES`, then scroll internally
//! - Flash a red border when a submission was rejected
//!
//! ## State Management
//!
//! The buffer is internal state. `focused` is a prop set by the parent each
//! frame. The buffer is not cleared on submit: the parent calls `clear()` once
//! the core has accepted the message, so a rejected draft stays editable.

mod cursor;
mod text_wrap;

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, TEXT_OFFSET_X, TEXT_OFFSET_Y, VERTICAL_OVERHEAD, inner_width,
    layout_rows, next_char_boundary, prev_char_boundary, wrap_line_count,
};

/// How long the error border stays up after a rejected submission.
pub const ERROR_FLASH: Duration = Duration::from_millis(1500);

const PLACEHOLDER: &str = "Type your message...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed; carries the raw buffer (validation happens in core)
    Submit(String),
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `focused`: whether keystrokes are routed here
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Cursor position, scroll offset, and cached width (see `CursorState`)
/// - `error_until`: deadline for the rejected-submission border
pub struct InputBox {
    pub buffer: String,
    pub focused: bool,
    cursor: CursorState,
    error_until: Option<Instant>,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            focused: true,
            cursor: CursorState::new(),
            error_until: None,
        }
    }

    /// Box height for the current content at `area_width`, borders included.
    /// Ranges from `1 + VERTICAL_OVERHEAD` to `MAX_VISIBLE_LINES + VERTICAL_OVERHEAD`.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let content_lines = wrap_line_count(&self.buffer, inner_width(area_width));
        content_lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Empty the draft and reset the cursor.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    /// Start the error border, replacing any flash already running.
    pub fn flash_error(&mut self, now: Instant) {
        self.error_until = Some(now + ERROR_FLASH);
    }

    pub fn is_flashing(&self, now: Instant) -> bool {
        self.error_until.is_some_and(|until| now < until)
    }

    /// Place the cursor at a click inside the text area, if it lands on text.
    pub fn click_at(&mut self, column: u16, row: u16, area: Rect) {
        let width = inner_width(area.width);
        let rows = layout_rows(&self.buffer, width);
        let text_top = area.y + TEXT_OFFSET_Y;
        let text_left = area.x + TEXT_OFFSET_X;
        if row < text_top || column < text_left {
            return;
        }
        let index = usize::from(row - text_top + self.cursor.scroll_offset);
        let Some(range) = rows.get(index) else {
            return;
        };
        let column = usize::from(column - text_left);
        self.cursor.pos = self.buffer[range.clone()]
            .char_indices()
            .nth(column)
            .map(|(i, _)| range.start + i)
            .unwrap_or(range.end);
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }

    fn visible_lines(&self, area_width: u16) -> Vec<Line<'static>> {
        let rows = layout_rows(&self.buffer, inner_width(area_width));
        rows.into_iter()
            .skip(usize::from(self.cursor.scroll_offset))
            .take(usize::from(MAX_VISIBLE_LINES))
            .map(|r| Line::raw(self.buffer[r].to_string()))
            .collect()
    }

    fn border_style(&self, now: Instant) -> Style {
        if self.is_flashing(now) {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    }

    /// Scrollbar when content exceeds the visible rows
    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total_lines = wrap_line_count(&self.buffer, inner_width(area.width));
        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }

        // content_length is the max scroll position, not the line count
        let max_scroll = total_lines.saturating_sub(MAX_VISIBLE_LINES);
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(usize::from(max_scroll))
            .position(usize::from(self.cursor.scroll_offset));

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let now = Instant::now();
        self.cursor.last_area_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let border_style = self.border_style(now);
        let title = if self.is_flashing(now) {
            "Message (type something first)"
        } else {
            "Message"
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::styled(title, border_style))
            .padding(Padding::horizontal(TEXT_OFFSET_X - 1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Line::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.visible_lines(area.width)).style(Style::default().fg(Color::Green))
        };

        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area);

        if self.focused {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut encoded));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::NewLine => {
                self.insert_str("\n");
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert_str(&normalized);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, false, self.cursor.last_area_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, true, self.cursor.last_area_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
