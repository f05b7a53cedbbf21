//! Error types for Commander
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Commander operations
///
/// Covers configuration loading, history storage, settings persistence,
/// backend calls, and user input validation.
#[derive(Error, Debug)]
pub enum CommanderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat history storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Settings persistence errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// A backend operation failed
    #[error("Backend error: {operation}: {message}")]
    Backend {
        /// Name of the logical backend operation
        operation: &'static str,
        /// Failure description
        message: String,
    },

    /// User supplied value could not be accepted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Raw database errors from rusqlite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl CommanderError {
    /// Build a backend error for the named operation
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Result type alias for Commander operations
///
/// Uses `anyhow::Error` as the error type so callers can attach context
/// while still downcasting to [`CommanderError`] where needed.
pub type Result<T> = anyhow::Result<T>;
