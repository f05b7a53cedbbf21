//! Export of segmented chat history to JSON or Markdown

use crate::chat::message::ChatSession;
use crate::error::{CommanderError, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON document
    Json,
    /// Human readable Markdown transcript
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = CommanderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(CommanderError::InvalidInput(format!(
                "unsupported export format '{}', expected json or markdown",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render `sessions` of `project_path` in the requested format
///
/// With `include_metadata` the JSON export embeds each session verbatim;
/// without it a compact per-message shape is used. Markdown ignores the flag.
pub fn export_sessions(
    project_path: &str,
    sessions: &[ChatSession],
    format: ExportFormat,
    include_metadata: bool,
) -> Result<String> {
    export_sessions_at(project_path, sessions, format, include_metadata, Utc::now())
}

pub(crate) fn export_sessions_at(
    project_path: &str,
    sessions: &[ChatSession],
    format: ExportFormat,
    include_metadata: bool,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    tracing::debug!(
        project = %project_path,
        sessions = sessions.len(),
        %format,
        "Exporting chat history"
    );

    match format {
        ExportFormat::Json => export_json(project_path, sessions, include_metadata, exported_at),
        ExportFormat::Markdown => Ok(export_markdown(project_path, sessions, exported_at)),
    }
}

fn export_json(
    project_path: &str,
    sessions: &[ChatSession],
    include_metadata: bool,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let sessions_data: Vec<serde_json::Value> = sessions
        .iter()
        .map(|session| {
            if include_metadata {
                json!({
                    "session": {
                        "start": session.start,
                        "end": session.end(),
                        "agent": session.agent,
                        "summary": session.summary,
                        "message_count": session.message_count(),
                    },
                    "messages": session.messages,
                })
            } else {
                let messages: Vec<serde_json::Value> = session
                    .messages
                    .iter()
                    .map(|m| {
                        json!({
                            "role": m.role,
                            "content": m.content,
                            "timestamp": m.timestamp,
                            "agent": m.agent,
                        })
                    })
                    .collect();
                json!({
                    "start": session.start,
                    "agent": session.agent,
                    "summary": session.summary,
                    "messages": messages,
                })
            }
        })
        .collect();

    let document = json!({
        "export_date": exported_at.to_rfc3339(),
        "project_path": project_path,
        "sessions": sessions_data,
    });

    Ok(serde_json::to_string_pretty(&document).map_err(CommanderError::from)?)
}

fn export_markdown(
    project_path: &str,
    sessions: &[ChatSession],
    exported_at: DateTime<Utc>,
) -> String {
    let mut markdown = String::from("# Chat History Export\n\n");
    markdown.push_str(&format!("**Project:** {}\n", project_path));
    markdown.push_str(&format!("**Export Date:** {}\n\n", exported_at.to_rfc3339()));

    for session in sessions {
        markdown.push_str(&format!(
            "## Session: {} ({})\n\n",
            session.summary,
            format_timestamp(session.start)
        ));
        if let Some(agent) = &session.agent {
            markdown.push_str(&format!("**Agent:** {}\n", agent));
        }
        markdown.push_str(&format!("**Messages:** {}\n\n", session.message_count()));

        for message in &session.messages {
            let heading = match message.role.as_str() {
                "user" => "**User**".to_string(),
                "assistant" => "**Assistant**".to_string(),
                other => format!("**{}**", other),
            };
            markdown.push_str(&format!("{}\n\n{}\n\n---\n\n", heading, message.content));
        }
    }

    markdown
}

/// Format a millisecond timestamp as a UTC date-time string
pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{segment_messages, ChatMessage};
    use chrono::TimeZone;

    fn sample_sessions() -> Vec<ChatSession> {
        segment_messages(&[
            ChatMessage::user("add tests", 1_700_000_000_000).with_agent("claude"),
            ChatMessage::assistant("done", 1_700_000_001_000).with_agent("claude"),
        ])
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("html".parse::<ExportFormat>().is_err());
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_json_export_compact_shape() {
        let out = export_sessions_at("/p", &sample_sessions(), ExportFormat::Json, false, fixed_time())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["project_path"], "/p");
        assert_eq!(value["sessions"][0]["summary"], "add tests");
        assert_eq!(value["sessions"][0]["messages"][1]["role"], "assistant");
        assert!(value["sessions"][0].get("session").is_none());
    }

    #[test]
    fn test_json_export_with_metadata() {
        let out = export_sessions_at("/p", &sample_sessions(), ExportFormat::Json, true, fixed_time())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["sessions"][0]["session"]["message_count"], 2);
        assert_eq!(value["sessions"][0]["session"]["agent"], "claude");
    }

    #[test]
    fn test_markdown_export() {
        let out = export_sessions_at(
            "/p",
            &sample_sessions(),
            ExportFormat::Markdown,
            false,
            fixed_time(),
        )
        .unwrap();
        assert!(out.starts_with("# Chat History Export"));
        assert!(out.contains("## Session: add tests (2023-11-14 22:13:20)"));
        assert!(out.contains("**Agent:** claude"));
        assert!(out.contains("**User**\n\nadd tests"));
        assert!(out.contains("**Export Date:** 2025-01-02T03:04:05+00:00"));
    }
}
