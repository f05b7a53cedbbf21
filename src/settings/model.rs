//! Application and agent settings models
//!
//! Every field carries a serde default so settings files written by older
//! releases, or edited by hand, still load.

use crate::error::{CommanderError, Result};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// Agents that may be selected as the default CLI agent
pub const ALLOWED_DEFAULT_CLI_AGENTS: &[&str] = &["claude", "codex", "gemini", "ollama"];

/// Accepted UI theme values
pub const UI_THEMES: &[&str] = &["auto", "light", "dark"];

/// Accepted chat send shortcuts
pub const CHAT_SEND_SHORTCUTS: &[&str] = &["mod+enter", "enter"];

/// Application-wide preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Show raw CLI output under agent replies
    #[serde(default = "default_true")]
    pub show_console_output: bool,

    /// Folder new projects are created in
    #[serde(default)]
    pub projects_folder: Option<String>,

    /// Enable `@file` mention completion in the chat input
    #[serde(default = "default_true")]
    pub file_mentions_enabled: bool,

    /// UI theme: "auto" | "light" | "dark"
    #[serde(default = "default_ui_theme")]
    pub ui_theme: String,

    /// Chat send shortcut: "mod+enter" | "enter"
    #[serde(default = "default_chat_send_shortcut")]
    pub chat_send_shortcut: String,

    /// Show recent projects on the welcome screen
    #[serde(default = "default_true")]
    pub show_welcome_recent_projects: bool,

    /// Messages kept in memory per conversation
    #[serde(default = "default_max_chat_history")]
    pub max_chat_history: u32,

    /// Agent used when a prompt has no `/agent` prefix
    #[serde(
        default = "default_cli_agent",
        deserialize_with = "deserialize_default_cli_agent"
    )]
    pub default_cli_agent: String,

    /// Code viewer settings
    #[serde(default)]
    pub code_settings: CodeSettings,
}

fn default_true() -> bool {
    true
}

fn default_ui_theme() -> String {
    "auto".to_string()
}

fn default_chat_send_shortcut() -> String {
    "mod+enter".to_string()
}

fn default_max_chat_history() -> u32 {
    15
}

fn default_cli_agent() -> String {
    "claude".to_string()
}

fn sanitize_default_cli_agent(value: &str) -> String {
    let normalized = value.trim().to_ascii_lowercase();
    if ALLOWED_DEFAULT_CLI_AGENTS.contains(&normalized.as_str()) {
        normalized
    } else {
        default_cli_agent()
    }
}

fn deserialize_default_cli_agent<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_cli_agent);
    Ok(sanitize_default_cli_agent(&raw))
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_console_output: true,
            projects_folder: None,
            file_mentions_enabled: true,
            ui_theme: default_ui_theme(),
            chat_send_shortcut: default_chat_send_shortcut(),
            show_welcome_recent_projects: true,
            max_chat_history: default_max_chat_history(),
            default_cli_agent: default_cli_agent(),
            code_settings: CodeSettings::default(),
        }
    }
}

impl AppSettings {
    /// Coerce free-form fields back into their accepted value sets
    pub fn normalize(&mut self) {
        self.default_cli_agent = sanitize_default_cli_agent(&self.default_cli_agent);

        let theme = self.ui_theme.trim().to_ascii_lowercase();
        self.ui_theme = if UI_THEMES.contains(&theme.as_str()) {
            theme
        } else {
            default_ui_theme()
        };

        let shortcut = self.chat_send_shortcut.trim().to_ascii_lowercase();
        self.chat_send_shortcut = if CHAT_SEND_SHORTCUTS.contains(&shortcut.as_str()) {
            shortcut
        } else {
            default_chat_send_shortcut()
        };
    }

    /// Set a field by dotted key, as used by `commander settings set`
    ///
    /// # Errors
    ///
    /// Returns [`CommanderError::InvalidInput`] for unknown keys and values
    /// that do not parse or fall outside the accepted set.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "show_console_output" => self.show_console_output = parse_bool(key, value)?,
            "projects_folder" => {
                self.projects_folder = (!value.trim().is_empty()).then(|| value.to_string())
            }
            "file_mentions_enabled" => self.file_mentions_enabled = parse_bool(key, value)?,
            "ui_theme" => self.ui_theme = parse_choice(key, value, UI_THEMES)?,
            "chat_send_shortcut" => {
                self.chat_send_shortcut = parse_choice(key, value, CHAT_SEND_SHORTCUTS)?
            }
            "show_welcome_recent_projects" => {
                self.show_welcome_recent_projects = parse_bool(key, value)?
            }
            "max_chat_history" => self.max_chat_history = parse_number(key, value)?,
            "default_cli_agent" => {
                self.default_cli_agent = parse_choice(key, value, ALLOWED_DEFAULT_CLI_AGENTS)?
            }
            "code_settings.theme" => self.code_settings.theme = value.trim().to_string(),
            "code_settings.font_size" => {
                let size: u16 = parse_number(key, value)?;
                if !(8..=48).contains(&size) {
                    return Err(CommanderError::InvalidInput(format!(
                        "{} must be between 8 and 48, got {}",
                        key, size
                    ))
                    .into());
                }
                self.code_settings.font_size = size;
            }
            "code_settings.auto_collapse_sidebar" => {
                self.code_settings.auto_collapse_sidebar = parse_bool(key, value)?
            }
            other => return Err(unknown_setting(other)),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CommanderError::InvalidInput(format!(
            "{} expects a boolean, got '{}'",
            key, value
        ))
        .into()),
    }
}

fn parse_number<N: std::str::FromStr>(key: &str, value: &str) -> Result<N> {
    value.trim().parse::<N>().map_err(|_| {
        CommanderError::InvalidInput(format!("{} expects a number, got '{}'", key, value)).into()
    })
}

fn parse_choice(key: &str, value: &str, allowed: &[&str]) -> Result<String> {
    let normalized = value.trim().to_ascii_lowercase();
    if allowed.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(CommanderError::InvalidInput(format!(
            "{} must be one of: {}",
            key,
            allowed.join(", ")
        ))
        .into())
    }
}

/// Code viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSettings {
    /// Syntax theme, e.g. "github" or "dracula"
    #[serde(default = "default_code_theme")]
    pub theme: String,
    /// Font size in px
    #[serde(default = "default_font_size")]
    pub font_size: u16,
    /// Collapse the project sidebar when the code view opens
    #[serde(default)]
    pub auto_collapse_sidebar: bool,
}

fn default_code_theme() -> String {
    "github".to_string()
}

fn default_font_size() -> u16 {
    14
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            theme: default_code_theme(),
            font_size: default_font_size(),
            auto_collapse_sidebar: false,
        }
    }
}

/// Per-agent CLI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub sandbox_mode: bool,
    #[serde(default)]
    pub auto_approval: bool,
    #[serde(default = "default_session_timeout_minutes")]
    pub session_timeout_minutes: u32,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default)]
    pub debug_mode: bool,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_session_timeout_minutes() -> u32 {
    30
}

fn default_output_format() -> String {
    "markdown".to_string()
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: None,
            sandbox_mode: false,
            auto_approval: false,
            session_timeout_minutes: default_session_timeout_minutes(),
            output_format: default_output_format(),
            debug_mode: false,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Settings for every supported agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllAgentSettings {
    #[serde(default)]
    pub claude: AgentSettings,
    #[serde(default)]
    pub codex: AgentSettings,
    #[serde(default)]
    pub gemini: AgentSettings,
    #[serde(default = "default_max_concurrent_sessions")]
    pub max_concurrent_sessions: u32,
}

fn default_max_concurrent_sessions() -> u32 {
    10
}

impl Default for AllAgentSettings {
    fn default() -> Self {
        Self {
            claude: AgentSettings::default(),
            codex: AgentSettings::default(),
            gemini: AgentSettings::default(),
            max_concurrent_sessions: default_max_concurrent_sessions(),
        }
    }
}

impl AgentSettings {
    fn set_field(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        match field {
            "enabled" => self.enabled = parse_bool(key, value)?,
            "model" => self.model = parse_optional(value, |v| Ok(v.to_string()))?,
            "sandbox_mode" => self.sandbox_mode = parse_bool(key, value)?,
            "auto_approval" => self.auto_approval = parse_bool(key, value)?,
            "session_timeout_minutes" => self.session_timeout_minutes = parse_number(key, value)?,
            "output_format" => self.output_format = value.trim().to_string(),
            "debug_mode" => self.debug_mode = parse_bool(key, value)?,
            "max_tokens" => self.max_tokens = parse_optional(value, |v| parse_number(key, v))?,
            "temperature" => {
                let temperature: Option<f32> = parse_optional(value, |v| parse_number(key, v))?;
                if temperature.is_some_and(|t| !(0.0..=2.0).contains(&t)) {
                    return Err(CommanderError::InvalidInput(format!(
                        "{} must be between 0 and 2",
                        key
                    ))
                    .into());
                }
                self.temperature = temperature;
            }
            _ => return Err(unknown_setting(key)),
        }
        Ok(())
    }
}

impl AllAgentSettings {
    /// Set a field by `<agent>.<field>` key, or `max_concurrent_sessions`
    ///
    /// An empty value clears optional fields such as `claude.model`.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        if key == "max_concurrent_sessions" {
            let max: u32 = parse_number(key, value)?;
            if max == 0 {
                return Err(CommanderError::InvalidInput(format!(
                    "{} must be greater than 0",
                    key
                ))
                .into());
            }
            self.max_concurrent_sessions = max;
            return Ok(());
        }

        let Some((agent, field)) = key.split_once('.') else {
            return Err(unknown_setting(key));
        };
        let settings = match agent {
            "claude" => &mut self.claude,
            "codex" => &mut self.codex,
            "gemini" => &mut self.gemini,
            _ => return Err(unknown_setting(key)),
        };
        settings.set_field(key, field, value)
    }
}

fn parse_optional<T>(value: &str, parse: impl FnOnce(&str) -> Result<T>) -> Result<Option<T>> {
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else {
        parse(value).map(Some)
    }
}

fn unknown_setting(key: &str) -> anyhow::Error {
    CommanderError::InvalidInput(format!("unknown setting '{}'", key)).into()
}
