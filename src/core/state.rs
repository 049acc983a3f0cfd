//! # Application State
//!
//! Core chat state for Parley. Domain logic only: no TUI types. Presentation
//! state (input buffer, scroll position, focus) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>   // chat server
//! ├── transcript: Transcript          // messages + typing indicator
//! ├── bot_name: String                // display name for replies
//! ├── status_message: String          // title bar text
//! ├── sanitize_bot_html: bool         // allow-list bot markup
//! ├── reply_delay: Duration           // pause before showing a reply
//! └── in_flight: usize                // exchanges awaiting the server
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::ChatBackend;
use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::core::transcript::Transcript;

/// Pause between the server's answer and the reply appearing.
pub const REPLY_DELAY: Duration = Duration::from_millis(500);

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub transcript: Transcript,
    pub bot_name: String,
    pub status_message: String,
    pub sanitize_bot_html: bool,
    pub reply_delay: Duration,
    /// Exchanges whose server response has not arrived yet. Nothing stops the
    /// user from submitting again while this is non-zero.
    pub in_flight: usize,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, bot_name: String) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            bot_name,
            status_message: String::new(),
            sanitize_bot_html: false,
            reply_delay: REPLY_DELAY,
            in_flight: 0,
        }
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(backend, config.bot_name.clone());
        app.sanitize_bot_html = config.sanitize_bot_html;
        if let Some(greeting) = &config.greeting {
            app.greet(greeting);
        }
        app
    }

    /// Open the transcript with a greeting stamped with the current time.
    /// Empty greetings are skipped.
    pub fn greet(&mut self, greeting: &str) {
        if greeting.trim().is_empty() {
            return;
        }
        let message = if self.sanitize_bot_html {
            Message::bot_sanitized(greeting)
        } else {
            Message::bot(greeting)
        };
        self.transcript.push(message);
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;
    use crate::test_support::{test_app, test_config};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.bot_name, "Test Bot");
        assert!(app.transcript.is_empty());
        assert!(!app.is_waiting());
        assert_eq!(app.reply_delay, REPLY_DELAY);
    }

    #[test]
    fn from_config_adds_greeting() {
        let mut config = test_config();
        config.greeting = Some("Hello <b>there</b>".to_string());
        let app = App::from_config(test_app().backend, &config);

        let first = app.transcript.messages().next().unwrap();
        assert_eq!(first.sender, Sender::Bot);
        assert_eq!(first.markup, "Hello <b>there</b>");
    }

    #[test]
    fn blank_greeting_is_skipped() {
        let mut app = test_app();
        app.greet("   ");
        assert!(app.transcript.is_empty());
    }
}
