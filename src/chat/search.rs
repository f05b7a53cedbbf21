//! Session search and retention filtering

use super::message::ChatSession;

/// Milliseconds in one day
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Filters for [`search_sessions`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive text looked for in summaries and message bodies
    pub text: String,
    /// Only sessions whose agent equals this one
    pub agent: Option<String>,
    /// Keep at most this many matches
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn matches(&self, session: &ChatSession, needle: &str) -> bool {
        if let Some(agent) = &self.agent {
            if session.agent.as_deref() != Some(agent.as_str()) {
                return false;
            }
        }

        session.summary.to_lowercase().contains(needle)
            || session
                .messages
                .iter()
                .any(|m| m.content.to_lowercase().contains(needle))
    }
}

/// Sessions matching `query`, in the order given
///
/// # Examples
///
/// ```
/// use commander::chat::{search_sessions, segment_messages, ChatMessage, SearchQuery};
///
/// let sessions = segment_messages(&[
///     ChatMessage::user("Fix the Parser", 0).with_agent("claude"),
///     ChatMessage::user("write docs", 1_000).with_agent("codex"),
/// ]);
/// let hits = search_sessions(&sessions, &SearchQuery::new("parser"));
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].agent.as_deref(), Some("claude"));
/// ```
pub fn search_sessions<'a>(sessions: &'a [ChatSession], query: &SearchQuery) -> Vec<&'a ChatSession> {
    let needle = query.text.to_lowercase();
    let hits = sessions.iter().filter(|s| query.matches(s, &needle));

    match query.limit {
        Some(limit) => hits.take(limit).collect(),
        None => hits.collect(),
    }
}

/// Cutoff timestamp for a retention period ending at `now_ms`
pub fn retention_cutoff(now_ms: i64, retention_days: u32) -> i64 {
    now_ms.saturating_sub(i64::from(retention_days).saturating_mul(DAY_MS))
}

/// True when the session's last message is older than `cutoff_ms`
pub fn is_expired(session: &ChatSession, cutoff_ms: i64) -> bool {
    session.end() < cutoff_ms
}
