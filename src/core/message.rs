//! Transcript messages.
//!
//! A `Message` is created when the user submits or a reply arrives, appended
//! to the transcript, and never touched again.

use chrono::{DateTime, Local};

use crate::core::markup::{escape_html, sanitize};

/// Bot message shown whenever an exchange fails, whatever the cause.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    /// Markup body. User text is escaped; bot markup is trusted.
    pub markup: String,
    /// Local wall-clock time at creation, `HH:MM`.
    pub timestamp: String,
}

impl Message {
    /// A message typed by the user. The text is escaped so it always displays
    /// literally.
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            markup: escape_html(text),
            timestamp: current_time(),
        }
    }

    /// A reply from the backend, inserted verbatim.
    pub fn bot(markup: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            markup: markup.into(),
            timestamp: current_time(),
        }
    }

    /// A reply from the backend, passed through the allow-list first.
    pub fn bot_sanitized(markup: &str) -> Self {
        Self::bot(sanitize(markup))
    }

    /// The fixed reply shown when an exchange fails.
    pub fn fallback() -> Self {
        Self::bot(FALLBACK_REPLY)
    }
}

/// Current local time as `HH:MM`.
pub fn current_time() -> String {
    format_time(&Local::now())
}

pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn user_message_is_escaped() {
        let msg = Message::user("<script>alert(1)</script>");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.markup, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn bot_message_is_verbatim() {
        let msg = Message::bot("<b>hi</b>");
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.markup, "<b>hi</b>");
    }

    #[test]
    fn sanitized_bot_message_drops_script() {
        let msg = Message::bot_sanitized("<b>hi</b><script>x</script>");
        assert_eq!(msg.markup, "<b>hi</b>");
    }

    #[test]
    fn fallback_text_is_fixed() {
        assert_eq!(
            Message::fallback().markup,
            "Sorry, I encountered an error. Please try again."
        );
    }

    #[test]
    fn format_time_is_hour_minute() {
        let t = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        assert_eq!(format_time(&t), "07:05");
    }

    #[test]
    fn current_time_shape() {
        let ts = current_time();
        assert_eq!(ts.len(), 5);
        assert_eq!(&ts[2..3], ":");
    }
}
