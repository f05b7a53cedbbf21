//! Chat history segmentation
//!
//! Partitions a flat, chronologically ordered transcript into display
//! sessions. A new session starts when the time since the previous message
//! exceeds the configured gap, or when a message names an agent different
//! from the agent most recently seen in the scan.
//!
//! The partition is lossless: reading the returned sessions from last to
//! first and concatenating their messages yields the input unchanged.

use crate::chat::message::{ChatMessage, ChatSession};
use crate::chat::summary::{summarize_with_limit, DEFAULT_SUMMARY_MAX_CHARS};
use serde::{Deserialize, Serialize};

/// Default inactivity gap that closes a session (5 minutes)
pub const DEFAULT_SESSION_GAP_MS: i64 = 300_000;

/// Tunables for [`Segmenter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationOptions {
    /// Gap in milliseconds strictly above which a new session starts
    pub gap_ms: i64,
    /// Maximum summary length in characters
    pub summary_max_chars: usize,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            gap_ms: DEFAULT_SESSION_GAP_MS,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }
}

/// Groups messages into sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    options: SegmentationOptions,
}

impl Segmenter {
    /// Create a segmenter with explicit options
    pub fn new(options: SegmentationOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> SegmentationOptions {
        self.options
    }

    /// Segment `messages` into sessions, most recently started first
    pub fn segment(&self, messages: &[ChatMessage]) -> Vec<ChatSession> {
        if messages.is_empty() {
            return Vec::new();
        }

        let mut sessions = Vec::new();
        let mut group: Vec<ChatMessage> = Vec::new();
        let mut last_timestamp: i64 = 0;
        let mut last_agent = String::new();

        for message in messages {
            let gap = message.timestamp.saturating_sub(last_timestamp);
            let agent_changed = message
                .agent
                .as_deref()
                .is_some_and(|agent| agent != last_agent);

            // Either rule only ever closes a non-empty group, so the first
            // message always seeds the first session.
            let close = gap > self.options.gap_ms || (agent_changed && !group.is_empty());
            if close && !group.is_empty() {
                sessions.push(self.finalize(std::mem::take(&mut group), &last_agent));
            }

            group.push(message.clone());
            last_timestamp = message.timestamp;
            if let Some(agent) = &message.agent {
                last_agent.clone_from(agent);
            }
        }

        if !group.is_empty() {
            sessions.push(self.finalize(group, &last_agent));
        }

        sessions.reverse();
        sessions
    }

    fn finalize(&self, group: Vec<ChatMessage>, last_agent: &str) -> ChatSession {
        ChatSession {
            start: group[0].timestamp,
            agent: (!last_agent.is_empty()).then(|| last_agent.to_string()),
            summary: summarize_with_limit(&group, self.options.summary_max_chars),
            messages: group,
        }
    }
}

/// Segment with default options (5 minute gap, 80 character summaries)
///
/// # Examples
///
/// ```
/// use commander::chat::{segment_messages, ChatMessage};
///
/// let messages = vec![
///     ChatMessage::user("hello", 0).with_agent("claude"),
///     ChatMessage::user("switch", 1_000).with_agent("codex"),
/// ];
/// let sessions = segment_messages(&messages);
/// assert_eq!(sessions.len(), 2);
/// assert_eq!(sessions[0].agent.as_deref(), Some("codex"));
/// ```
pub fn segment_messages(messages: &[ChatMessage]) -> Vec<ChatSession> {
    Segmenter::default().segment(messages)
}
