//! Test utilities for Commander
//!
//! Temporary storage, backends wired to temp dirs, transcript builders and
//! assertion helpers shared by the unit tests.

use crate::backend::LocalBackend;
use crate::chat::ChatMessage;
use crate::settings::SettingsStore;
use crate::storage::SqliteStorage;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Local backend whose database and settings live in a fresh temp dir
///
/// Keep the returned `TempDir` alive for as long as the backend is used.
pub fn temp_backend() -> (TempDir, LocalBackend) {
    let dir = temp_dir();
    let storage = SqliteStorage::new_with_path(dir.path().join("history.db"))
        .expect("Failed to create sqlite storage");
    let settings = SettingsStore::new_with_dir(dir.path().join("settings"));
    (dir, LocalBackend::new(storage, settings))
}

/// Build a transcript from `(role, text, timestamp, agent)` tuples
pub fn transcript(entries: &[(&str, &str, i64, Option<&str>)]) -> Vec<ChatMessage> {
    entries
        .iter()
        .map(|(role, text, timestamp, agent)| {
            let message = ChatMessage::new(*role, *text, *timestamp);
            match agent {
                Some(agent) => message.with_agent(*agent),
                None => message,
            }
        })
        .collect()
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommanderError;

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_transcript_builder() {
        let messages = transcript(&[("user", "hi", 1, Some("claude")), ("assistant", "yo", 2, None)]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].agent.as_deref(), Some("claude"));
        assert!(messages[1].agent.is_none());
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(CommanderError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }
}
