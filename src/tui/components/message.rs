use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{Message as ChatMessage, Sender};
use crate::tui::component::Component;
use crate::tui::markup;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;

/// A single chat bubble: bordered box titled with the sender, timestamp on
/// the right, markup rendered inside.
///
/// Transient: built fresh each frame by `MessageList` for the visible rows.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    /// Display name used for bot messages
    pub bot_name: &'a str,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, bot_name: &'a str) -> Self {
        Self { message, bot_name }
    }

    fn content(message: &ChatMessage) -> Text<'static> {
        markup::render(&message.markup, sender_style(message.sender))
    }

    /// Height needed at `width`, measured with the same `Paragraph` wrapping
    /// used for rendering so the scroll layout never drifts from what is drawn.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let text = Self::content(message);
        if text.lines.is_empty() {
            return VERTICAL_OVERHEAD + 1;
        }

        let lines = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn role(&self) -> &str {
        match self.message.sender {
            Sender::User => "You",
            Sender::Bot => self.bot_name,
        }
    }
}

fn sender_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Green),
        Sender::Bot => Style::default().fg(Color::Blue),
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = sender_style(self.message.sender);
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::styled(self.role().to_string(), style))
            .title(
                Line::styled(
                    self.message.timestamp.clone(),
                    Style::default().fg(Color::DarkGray),
                )
                .right_aligned(),
            )
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Self::content(self.message))
            .wrap(Wrap { trim: false })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
