//! One-line labels for chat sessions

use crate::chat::message::ChatMessage;

/// Label used when a session contains no user message
pub const EMPTY_SESSION_SUMMARY: &str = "Empty session";

/// Default maximum summary length, in characters
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 80;

/// Summarize a session from its first user message
///
/// # Examples
///
/// ```
/// use commander::chat::{summarize, ChatMessage};
///
/// let messages = vec![
///     ChatMessage::assistant("ready", 0),
///     ChatMessage::user("fix the build", 10),
/// ];
/// assert_eq!(summarize(&messages), "fix the build");
/// ```
pub fn summarize(messages: &[ChatMessage]) -> String {
    summarize_with_limit(messages, DEFAULT_SUMMARY_MAX_CHARS)
}

/// Summarize a session, truncating to `max_chars` characters plus `...`
pub fn summarize_with_limit(messages: &[ChatMessage], max_chars: usize) -> String {
    let Some(first) = messages.iter().find(|m| m.is_user()) else {
        return EMPTY_SESSION_SUMMARY.to_string();
    };

    // Count characters, not bytes: content is arbitrary UTF-8.
    match first.content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &first.content[..cut]),
        None => first.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_only_session_is_empty() {
        let messages = vec![
            ChatMessage::assistant("hello", 0),
            ChatMessage::assistant("anyone?", 1),
        ];
        assert_eq!(summarize(&messages), "Empty session");
    }

    #[test]
    fn test_short_message_is_returned_unchanged() {
        let messages = vec![ChatMessage::user("Short message", 0)];
        assert_eq!(summarize(&messages), "Short message");
    }

    #[test]
    fn test_long_message_is_truncated_to_80_chars() {
        let content = "a".repeat(100);
        let summary = summarize(&[ChatMessage::user(content.clone(), 0)]);
        assert_eq!(summary.chars().count(), 83);
        assert_eq!(summary, format!("{}...", &content[..80]));
    }

    #[test]
    fn test_exactly_80_chars_is_not_truncated() {
        let content = "b".repeat(80);
        assert_eq!(summarize(&[ChatMessage::user(content.clone(), 0)]), content);
    }

    #[test]
    fn test_first_user_message_wins() {
        let messages = vec![
            ChatMessage::assistant("intro", 0),
            ChatMessage::user("first", 1),
            ChatMessage::user("second", 2),
        ];
        assert_eq!(summarize(&messages), "first");
    }

    #[test]
    fn test_multibyte_content_truncates_on_char_boundary() {
        let content = "é".repeat(90);
        let summary = summarize(&[ChatMessage::user(content, 0)]);
        assert_eq!(summary.chars().count(), 83);
        assert!(summary.starts_with("éé"));
    }

    #[test]
    fn test_custom_limit() {
        let summary = summarize_with_limit(&[ChatMessage::user("abcdefgh", 0)], 3);
        assert_eq!(summary, "abc...");
    }

    #[test]
    fn test_empty_input_is_empty_session() {
        assert_eq!(summarize(&[]), EMPTY_SESSION_SUMMARY);
    }
}
