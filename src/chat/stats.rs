//! Aggregate statistics over segmented chat history

use crate::chat::message::ChatSession;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bucket used for sessions that never saw an agent tag
pub const UNKNOWN_AGENT: &str = "unknown";

/// Summary numbers for a project's chat history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of sessions
    pub total_sessions: usize,
    /// Number of messages across all sessions
    pub total_messages: usize,
    /// Session count per agent
    pub agents_used: BTreeMap<String, usize>,
    /// `(oldest start, newest end)` in ms, if there is any history
    pub date_range: Option<(i64, i64)>,
}

impl HistoryStats {
    /// Compute statistics from segmented sessions
    pub fn from_sessions(sessions: &[ChatSession]) -> Self {
        let mut stats = Self {
            total_sessions: sessions.len(),
            ..Self::default()
        };

        for session in sessions {
            let agent = session.agent.as_deref().unwrap_or(UNKNOWN_AGENT);
            *stats.agents_used.entry(agent.to_string()).or_insert(0) += 1;
            stats.total_messages += session.message_count();

            stats.date_range = Some(match stats.date_range {
                None => (session.start, session.end()),
                Some((min, max)) => (min.min(session.start), max.max(session.end())),
            });
        }

        stats
    }
}
