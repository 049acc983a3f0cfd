//! # Actions
//!
//! Everything that can happen to the conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(draft)`.
//! Server replies? That's `Action::ResponseArrived`, then `Action::ReplyReady`.
//!
//! `update()` applies an action to the `App` and returns an `Effect`: the
//! side effect the caller (the TUI loop) must perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Submission lifecycle:
//!
//! ```text
//! Idle ─Submit─▶ Validating ─empty─▶ Rejected ─▶ Idle
//!                    │
//!                    └─text─▶ Sending ─ResponseArrived─▶ (500ms) ─ReplyReady─▶ Idle
//!                               │
//!                               └─ExchangeFailed─▶ fallback reply ─▶ Idle
//! ```

use log::{debug, info, warn};

use crate::core::markup::plain_text;
use crate::core::message::Message;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The user submitted the draft (untrimmed).
    Submit(String),
    /// The server answered successfully; the reply follows after a pause.
    ResponseArrived,
    /// The reply is due for display.
    ReplyReady(String),
    /// The exchange failed. Carries the error description for the log.
    ExchangeFailed(String),
    Quit,
}

/// What the caller must do after `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The draft was empty: flash the input, keep the draft.
    Rejected,
    /// Clear the draft and start an exchange with this (trimmed) message.
    SpawnRequest(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(draft) => {
            let message = draft.trim();
            if message.is_empty() {
                debug!("Rejected empty submission");
                return Effect::Rejected;
            }

            app.transcript.push(Message::user(message));
            app.transcript.show_typing();
            app.in_flight += 1;
            app.status_message = format!("{} is typing...", app.bot_name);
            Effect::SpawnRequest(message.to_string())
        }
        Action::ResponseArrived => {
            app.transcript.hide_typing();
            app.in_flight = app.in_flight.saturating_sub(1);
            Effect::None
        }
        Action::ReplyReady(markup) => {
            debug!("Reply text: {:.80}", plain_text(&markup));
            let message = if app.sanitize_bot_html {
                Message::bot_sanitized(&markup)
            } else {
                Message::bot(markup)
            };
            app.transcript.push(message);
            if app.in_flight == 0 {
                app.status_message.clear();
            }
            info!("Reply rendered ({} messages)", app.transcript.message_count());
            Effect::None
        }
        Action::ExchangeFailed(error) => {
            warn!("Exchange failed: {}", error);
            app.transcript.hide_typing();
            app.in_flight = app.in_flight.saturating_sub(1);
            app.transcript.push(Message::fallback());
            app.status_message = String::from("Last reply failed");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{FALLBACK_REPLY, Sender};
    use crate::core::transcript::TranscriptItem;
    use crate::test_support::test_app;

    #[test]
    fn submit_appends_escaped_user_message_and_indicator() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  <i>hey</i>  ".to_string()));

        assert_eq!(effect, Effect::SpawnRequest("<i>hey</i>".to_string()));
        let items = &app.transcript.items;
        assert_eq!(items.len(), 2);
        match &items[0] {
            TranscriptItem::Message(m) => {
                assert_eq!(m.sender, Sender::User);
                assert_eq!(m.markup, "&lt;i&gt;hey&lt;/i&gt;");
            }
            other => panic!("expected message, got {:?}", other),
        }
        assert_eq!(items[1], TranscriptItem::Typing);
        assert_eq!(app.in_flight, 1);
    }

    #[test]
    fn empty_submit_is_rejected_without_side_effects() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::Rejected);
        assert_eq!(update(&mut app, Action::Submit(" \n\t ".into())), Effect::Rejected);
        assert!(app.transcript.is_empty());
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn success_hides_indicator_before_reply() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hi".into()));

        update(&mut app, Action::ResponseArrived);
        assert!(!app.transcript.is_typing());
        assert_eq!(app.transcript.message_count(), 1);

        update(&mut app, Action::ReplyReady("<b>hi</b>".into()));
        let last = app.transcript.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.markup, "<b>hi</b>");
        assert!(app.status_message.is_empty());
    }

    #[test]
    fn sanitizing_app_filters_reply() {
        let mut app = test_app();
        app.sanitize_bot_html = true;
        update(&mut app, Action::ReplyReady("<b>hi</b><script>x()</script>".into()));
        assert_eq!(app.transcript.messages().last().unwrap().markup, "<b>hi</b>");
    }

    #[test]
    fn failure_renders_fallback_after_indicator_removed() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hi".into()));
        update(&mut app, Action::ExchangeFailed("HTTP 500".into()));

        assert!(!app.transcript.is_typing());
        let items = &app.transcript.items;
        assert_eq!(items.len(), 2);
        match &items[1] {
            TranscriptItem::Message(m) => {
                assert_eq!(m.sender, Sender::Bot);
                assert_eq!(m.markup, FALLBACK_REPLY);
            }
            other => panic!("expected fallback message, got {:?}", other),
        }
        assert_eq!(app.in_flight, 0);
    }

    #[test]
    fn overlapping_submissions_share_one_indicator() {
        let mut app = test_app();
        update(&mut app, Action::Submit("one".into()));
        update(&mut app, Action::Submit("two".into()));

        let indicators = app
            .transcript
            .items
            .iter()
            .filter(|i| matches!(i, TranscriptItem::Typing))
            .count();
        assert_eq!(indicators, 1);
        assert_eq!(app.in_flight, 2);
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
