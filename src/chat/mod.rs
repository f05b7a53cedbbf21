//! Chat history model and pure transformations
//!
//! - `message`: transcript entries and derived sessions
//! - `segmentation`: time-gap and agent-change grouping
//! - `summary`: one-line session labels
//! - `mentions`: file path detection in message text
//! - `stats`: aggregate counts over sessions
//! - `search`: session search and retention filtering
//! - `export`: JSON and Markdown rendering

pub mod export;
pub mod mentions;
pub mod message;
pub mod search;
pub mod segmentation;
pub mod stats;
pub mod summary;

pub use export::{export_sessions, ExportFormat};
pub use mentions::extract_file_mentions;
pub use message::{ChatMessage, ChatSession, ROLE_ASSISTANT, ROLE_USER};
pub use search::{is_expired, retention_cutoff, search_sessions, SearchQuery, DAY_MS};
pub use segmentation::{
    segment_messages, SegmentationOptions, Segmenter, DEFAULT_SESSION_GAP_MS,
};
pub use stats::HistoryStats;
pub use summary::{
    summarize, summarize_with_limit, DEFAULT_SUMMARY_MAX_CHARS, EMPTY_SESSION_SUMMARY,
};
