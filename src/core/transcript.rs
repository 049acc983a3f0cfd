use crate::core::message::Message;

/// A single entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptItem {
    Message(Message),
    /// "Bot is typing..." placeholder while a reply is pending.
    Typing,
}

/// Append-only conversation history plus the typing indicator.
///
/// Messages are never reordered or removed. The only item that can leave the
/// transcript is the typing indicator, and at most one exists at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub items: Vec<TranscriptItem>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.items.push(TranscriptItem::Message(message));
    }

    /// Show the typing indicator. No-op if one is already present.
    pub fn show_typing(&mut self) {
        if !self.is_typing() {
            self.items.push(TranscriptItem::Typing);
        }
    }

    /// Remove the typing indicator if present.
    pub fn hide_typing(&mut self) {
        self.items.retain(|item| !matches!(item, TranscriptItem::Typing));
    }

    pub fn is_typing(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, TranscriptItem::Typing))
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.items.iter().filter_map(|item| match item {
            TranscriptItem::Message(m) => Some(m),
            TranscriptItem::Typing => None,
        })
    }

    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;

    #[test]
    fn typing_indicator_is_singleton() {
        let mut t = Transcript::new();
        t.show_typing();
        t.show_typing();
        assert_eq!(t.len(), 1);
        assert!(t.is_typing());

        t.hide_typing();
        assert!(!t.is_typing());
        assert!(t.is_empty());
    }

    #[test]
    fn hide_without_indicator_is_noop() {
        let mut t = Transcript::new();
        t.push(Message::user("hi"));
        t.hide_typing();
        assert_eq!(t.message_count(), 1);
    }

    #[test]
    fn messages_keep_insertion_order() {
        let mut t = Transcript::new();
        t.push(Message::user("one"));
        t.show_typing();
        t.push(Message::user("two"));
        t.hide_typing();
        t.push(Message::bot("three"));

        let bodies: Vec<_> = t.messages().map(|m| m.markup.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
        assert_eq!(t.messages().last().map(|m| m.sender), Some(Sender::Bot));
    }
}
