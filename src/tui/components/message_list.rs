//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Display every message plus the typing indicator
//! - Keep the newest entry in view while pinned to the bottom
//! - Cache per-item heights so only new rows are measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript` (props).
//! `Component::render` takes `&mut self`, so the layout cache and scroll
//! offset are updated during the render pass.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{Transcript, TranscriptItem};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Rows taken by the typing indicator.
const TYPING_HEIGHT: u16 = 1;
/// Dot animation cycle for the typing indicator.
const TYPING_DOTS: [&str; 4] = ["", ".", "..", "..."];

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Pin to the bottom; the next render scrolls the newest entry into view.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }

    /// Content exists below the viewport that the user hasn't scrolled to.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub bot_name: &'a str,
    /// Advances the typing indicator animation
    pub tick: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        bot_name: &'a str,
        tick: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            bot_name,
            tick,
        }
    }

    fn typing_line(&self) -> Line<'static> {
        let dots = TYPING_DOTS[self.tick % TYPING_DOTS.len()];
        Line::styled(
            format!(" {} is typing{}", self.bot_name, dots),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let transcript = self.transcript;
        let items = &transcript.items;

        if items.is_empty() {
            let hint = Paragraph::new(Line::styled(
                "No messages yet. Type below and press Enter.",
                Style::default().fg(Color::DarkGray),
            ))
            .centered();
            frame.render_widget(hint, area);
            return;
        }

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(items, content_width);
        layout.heights.truncate(reusable);
        for item in items.iter().skip(layout.heights.len()) {
            let height = match item {
                TranscriptItem::Message(message) => {
                    Message::calculate_height(message, content_width)
                }
                TranscriptItem::Typing => TYPING_HEIGHT,
            };
            layout.heights.push(height);
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(items, content_width);

        let total_height = self.state.layout.total_height();

        // 2. Pin or clamp the scroll offset before picking visible rows
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            let bottom = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let row = Rect::new(0, y_offset, content_width, height);
            match &items[i] {
                TranscriptItem::Message(message) => {
                    scroll_view.render_widget(Message::new(message, self.bot_name), row);
                }
                TranscriptItem::Typing => {
                    scroll_view.render_widget(self.typing_line(), row);
                }
            }
            y_offset += height;
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Implemented on the persistent state because `MessageList` is rebuilt
/// every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Cached per-item heights.
///
/// Messages never change once appended, so a cached height stays valid until
/// the width changes or the typing indicator moves (it is the only item that
/// can leave the transcript).
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
    typing_index: Option<usize>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

fn typing_index(items: &[TranscriptItem]) -> Option<usize> {
    items
        .iter()
        .position(|item| matches!(item, TranscriptItem::Typing))
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
            typing_index: None,
        }
    }

    /// Number of leading cached heights still valid for `items` at `content_width`.
    pub fn reusable_count(&self, items: &[TranscriptItem], content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }

        let cached = self.heights.len().min(items.len());
        match (self.typing_index, typing_index(items)) {
            (old, new) if old == new => cached,
            (Some(old), Some(new)) => cached.min(old.min(new)),
            (Some(idx), None) | (None, Some(idx)) => cached.min(idx),
            (None, None) => cached,
        }
    }

    pub fn update_metadata(&mut self, items: &[TranscriptItem], content_width: u16) {
        self.content_width = content_width;
        self.typing_index = typing_index(items);
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Items intersecting the viewport, padded by half a screen either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
