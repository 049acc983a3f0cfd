//! # TitleBar Component
//!
//! Top status bar: who you are talking to, what is happening, and whether
//! there is unseen content below the scroll position.
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Parley · AI Assistant | AI Assistant is typing... | ↓ New"`
//! 2. **Status message**: `"Parley · AI Assistant | Last reply failed"`
//! 3. **Default**: `"Parley · AI Assistant"`
//!
//! Purely presentational: all three props come from elsewhere (`bot_name` and
//! `status_message` from core `App`, `has_unseen_content` from the scroll state).

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Top status bar component.
pub struct TitleBar {
    /// Display name of the bot
    pub bot_name: String,
    /// Transient status (e.g. "AI Assistant is typing...")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(bot_name: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            bot_name,
            status_message,
            has_unseen_content,
        }
    }

    fn title_spans(&self) -> Vec<Span<'static>> {
        let mut spans = vec![
            Span::styled("Parley", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" · {}", self.bot_name)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Cyan)));
        }
        spans
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Line::from(self.title_spans()), area);
    }
}
