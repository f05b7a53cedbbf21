//! Chat message and derived chat session types

use serde::{Deserialize, Serialize};

/// Role string used for messages typed by the user
pub const ROLE_USER: &str = "user";

/// Role string used for agent replies
pub const ROLE_ASSISTANT: &str = "assistant";

/// A single transcript entry as produced by the message store
///
/// Timestamps are milliseconds since the Unix epoch. Sequences handed to the
/// segmenter are expected to be non-decreasing in `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sender role (`user`, `assistant`, ...)
    pub role: String,
    /// Message body
    pub content: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
    /// Agent tag (`claude`, `codex`, `gemini`, ...), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl ChatMessage {
    /// Create a message with an arbitrary role
    pub fn new(role: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp,
            agent: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self::new(ROLE_USER, content, timestamp)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self::new(ROLE_ASSISTANT, content, timestamp)
    }

    /// Attach an agent tag
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// True for messages typed by the user
    pub fn is_user(&self) -> bool {
        self.role == ROLE_USER
    }
}

/// A contiguous run of messages grouped for display
///
/// Sessions are a view-model artifact: they are recomputed on every load and
/// carry no identity beyond `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Timestamp of the first message in the group
    pub start: i64,
    /// Agent that was current when the group closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// One-line label
    pub summary: String,
    /// Messages in chronological order, never empty
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Timestamp of the last message
    pub fn end(&self) -> i64 {
        self.messages
            .last()
            .map(|m| m.timestamp)
            .unwrap_or(self.start)
    }

    /// Number of messages in the session
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Span between first and last message
    pub fn duration_ms(&self) -> i64 {
        self.end() - self.start
    }
}
