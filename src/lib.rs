//! Commander - AI coding session manager library
//!
//! This library provides the native side of the Commander desktop app: chat
//! history storage and segmentation, application settings with explicit
//! save/discard editing, prompt templates, the recent projects list, and a
//! typed backend client the UI layer calls.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Transcript model, session segmentation, summaries, export
//! - `storage`: SQLite persistence for messages and recent projects
//! - `settings`: Settings models, JSON file store, draft/committed state
//! - `projects`: Most-recently-used project list
//! - `prompts`: Prompt templates grouped by category
//! - `backend`: Typed async backend trait, local implementation, load guard
//! - `views`: History and settings view models
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use commander::chat::{segment_messages, ChatMessage};
//!
//! let transcript = vec![
//!     ChatMessage::user("add a login page", 0).with_agent("claude"),
//!     ChatMessage::assistant("done", 2_000).with_agent("claude"),
//!     ChatMessage::user("now write tests", 900_000).with_agent("claude"),
//! ];
//!
//! let sessions = segment_messages(&transcript);
//! assert_eq!(sessions.len(), 2);
//! assert_eq!(sessions[0].summary, "now write tests");
//! ```

pub mod backend;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod projects;
pub mod prompts;
pub mod settings;
pub mod storage;
pub mod views;

// Re-export commonly used types
pub use backend::{Backend, LocalBackend};
pub use chat::{segment_messages, ChatMessage, ChatSession};
pub use config::Config;
pub use error::{CommanderError, Result};
pub use settings::{AppSettings, DraftState};
pub use views::{AgentSettingsPanel, AppSettingsPanel, ChatHistoryView, SettingsPanel};

#[cfg(test)]
pub mod test_utils;
