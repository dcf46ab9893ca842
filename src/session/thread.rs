//! Append-only message thread with the single-interactive invariant.

use tracing::debug;

use crate::session::message::Message;

/// The session transcript. Messages are only ever appended; the sole
/// mutation of an existing message is freezing its interactive flag.
#[derive(Debug, Default)]
pub struct MessageThread {
    messages: Vec<Message>,
}

impl MessageThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frozen message.
    pub fn push(&mut self, message: Message) {
        debug_assert!(!message.interactive, "use push_interactive for prompts");
        self.messages.push(message);
    }

    /// Append an interactive message, freezing any currently interactive
    /// one first so the invariant holds.
    pub fn push_interactive(&mut self, message: Message) {
        self.freeze_interactive();
        debug!(message_id = %message.id, "Interactive turn appended");
        self.messages.push(message);
    }

    /// Freeze the currently interactive message, if any.
    pub fn freeze_interactive(&mut self) {
        if let Some(m) = self.messages.iter_mut().find(|m| m.interactive) {
            m.interactive = false;
        }
    }

    /// The currently interactive message, if any.
    pub fn interactive(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.interactive)
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The last message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Iterate messages oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.messages.iter()
    }

    /// Messages appended at or after `index` (for incremental rendering).
    pub fn since(&self, index: usize) -> &[Message] {
        &self.messages[index.min(self.messages.len())..]
    }
}
