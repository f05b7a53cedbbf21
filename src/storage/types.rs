use crate::chat::ChatMessage;
use serde::{Deserialize, Serialize};

/// A persisted chat message with its storage metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Row identifier (UUID v4)
    pub id: String,
    /// Project the message belongs to
    pub project_path: String,
    /// The message itself
    pub message: ChatMessage,
    /// File paths mentioned in the content
    pub file_mentions: Vec<String>,
}

/// Per-project overview of stored history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryProject {
    /// Project path
    pub path: String,
    /// Number of stored messages
    pub message_count: usize,
    /// Timestamp of the newest message, ms
    pub last_timestamp: i64,
}

/// Transcript entry in the pre-index JSON format
///
/// Older installs wrote one JSON array of these per project. Entries without
/// an agent were produced by the Claude-only releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyChatMessage {
    pub role: String,
    pub content: String,
    pub timestamp: i64,
    #[serde(default)]
    pub agent: Option<String>,
}

/// Agent assumed for legacy entries without a tag
pub const LEGACY_DEFAULT_AGENT: &str = "claude";

impl From<LegacyChatMessage> for ChatMessage {
    fn from(legacy: LegacyChatMessage) -> Self {
        ChatMessage {
            role: legacy.role,
            content: legacy.content,
            timestamp: legacy.timestamp,
            agent: Some(
                legacy
                    .agent
                    .unwrap_or_else(|| LEGACY_DEFAULT_AGENT.to_string()),
            ),
        }
    }
}
