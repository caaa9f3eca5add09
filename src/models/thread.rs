// ABOUTME: In-memory conversational context types (see thread_store)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadRole {
    User,
    Assistant,
}

/// One message in a conversation's short-lived context window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: ThreadRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// The bounded FIFO of recent messages for one conversation id.
///
/// This is context for prompt assembly only, never the state of record —
/// it is not persisted and does not survive a process restart.
#[derive(Debug, Clone, Default)]
pub struct ThreadContext {
    pub messages: Vec<ThreadMessage>,
}

impl ThreadContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a message, evicting the oldest if `max_len` is exceeded.
    pub fn push(&mut self, message: ThreadMessage, max_len: usize) {
        self.messages.push(message);
        if self.messages.len() > max_len {
            let overflow = self.messages.len() - max_len;
            self.messages.drain(0..overflow);
        }
    }

    /// Most recent `n` messages, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> &[ThreadMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}
