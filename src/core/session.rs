//! In-memory chat session state: the message store, the pending flag and the
//! draft input buffer.

use crate::core::message::{ChatMessage, ChatRole};

/// Point-in-time copy of a session, handed to renderers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
}

#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
    draft: String,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with a single assistant greeting already in place.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub(crate) fn clear_draft(&mut self) {
        self.draft.clear();
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Overwrite the text of the trailing assistant message. Returns false
    /// (and changes nothing) when the last message is not an assistant turn.
    pub(crate) fn replace_trailing_assistant_text(&mut self, text: &str) -> bool {
        match self.messages.last_mut() {
            Some(last) if last.role == ChatRole::Assistant => {
                last.text.clear();
                last.text.push_str(text);
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            pending: self.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_seeds_one_assistant_message() {
        let session = ChatSession::with_greeting("Ask me about Kolkata.");
        assert_eq!(session.len(), 1);
        assert!(session.messages()[0].is_assistant());
        assert!(!session.is_pending());
    }

    #[test]
    fn trailing_replace_only_touches_assistant_slot() {
        let mut session = ChatSession::new();
        session.push(ChatMessage::user("hello"));
        assert!(!session.replace_trailing_assistant_text("nope"));
        assert_eq!(session.last().map(|m| m.text.as_str()), Some("hello"));

        session.push(ChatMessage::assistant(""));
        assert!(session.replace_trailing_assistant_text("Ne"));
        assert!(session.replace_trailing_assistant_text("New"));
        assert_eq!(session.last().map(|m| m.text.as_str()), Some("New"));
        assert_eq!(session.len(), 2);
    }
}
