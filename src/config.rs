//! Configuration management for Commander
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::backend::LocalBackend;
use crate::chat::{SegmentationOptions, DEFAULT_SESSION_GAP_MS, DEFAULT_SUMMARY_MAX_CHARS};
use crate::error::{CommanderError, Result};
use crate::projects::DEFAULT_RECENT_PROJECTS_CAP;
use crate::settings::SettingsStore;
use crate::storage::SqliteStorage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Commander
///
/// Every section is optional in the YAML file; missing sections take their
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat history storage and segmentation
    #[serde(default)]
    pub history: HistoryConfig,
    /// Settings file location
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Recent projects list
    #[serde(default)]
    pub projects: ProjectsConfig,
}

/// Chat history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Database file; platform data dir when unset
    #[serde(default)]
    pub db_path: Option<String>,

    /// Inactivity gap in milliseconds that starts a new session
    #[serde(default = "default_session_gap_ms")]
    pub session_gap_ms: i64,

    /// Maximum session summary length in characters
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

fn default_session_gap_ms() -> i64 {
    DEFAULT_SESSION_GAP_MS
}

fn default_summary_max_chars() -> usize {
    DEFAULT_SUMMARY_MAX_CHARS
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            session_gap_ms: default_session_gap_ms(),
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

/// Settings storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Directory holding `settings.json`; platform config dir when unset
    #[serde(default)]
    pub dir: Option<String>,
}

/// Recent projects configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsConfig {
    /// Number of entries kept
    #[serde(default = "default_recent_cap")]
    pub recent_cap: usize,
}

fn default_recent_cap() -> usize {
    DEFAULT_RECENT_PROJECTS_CAP
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            recent_cap: default_recent_cap(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CommanderError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CommanderError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(db_path) = std::env::var("COMMANDER_HISTORY_DB") {
            self.history.db_path = Some(db_path);
        }

        if let Ok(gap) = std::env::var("COMMANDER_SESSION_GAP_MS") {
            if let Ok(value) = gap.parse() {
                self.history.session_gap_ms = value;
            } else {
                tracing::warn!("Invalid COMMANDER_SESSION_GAP_MS: {}", gap);
            }
        }

        if let Ok(max_chars) = std::env::var("COMMANDER_SUMMARY_MAX_CHARS") {
            if let Ok(value) = max_chars.parse() {
                self.history.summary_max_chars = value;
            } else {
                tracing::warn!("Invalid COMMANDER_SUMMARY_MAX_CHARS: {}", max_chars);
            }
        }

        if let Ok(dir) = std::env::var("COMMANDER_SETTINGS_DIR") {
            self.settings.dir = Some(dir);
        }

        if let Ok(cap) = std::env::var("COMMANDER_RECENT_PROJECTS_CAP") {
            if let Ok(value) = cap.parse() {
                self.projects.recent_cap = value;
            } else {
                tracing::warn!("Invalid COMMANDER_RECENT_PROJECTS_CAP: {}", cap);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(db_path) = &cli.storage_path {
            tracing::debug!("Using storage DB override from CLI: {}", db_path);
            self.history.db_path = Some(db_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of range
    pub fn validate(&self) -> Result<()> {
        if self.history.session_gap_ms <= 0 {
            return Err(CommanderError::Config(
                "history.session_gap_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.history.summary_max_chars == 0 {
            return Err(CommanderError::Config(
                "history.summary_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.projects.recent_cap == 0 {
            return Err(CommanderError::Config(
                "projects.recent_cap must be greater than 0".to_string(),
            )
            .into());
        }

        if matches!(&self.history.db_path, Some(p) if p.trim().is_empty()) {
            return Err(
                CommanderError::Config("history.db_path cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Segmentation tunables derived from the history section
    pub fn segmentation_options(&self) -> SegmentationOptions {
        SegmentationOptions {
            gap_ms: self.history.session_gap_ms,
            summary_max_chars: self.history.summary_max_chars,
        }
    }

    /// Open the history database this configuration points at
    pub fn open_storage(&self) -> Result<SqliteStorage> {
        match &self.history.db_path {
            Some(path) => SqliteStorage::new_with_path(path),
            None => SqliteStorage::new(),
        }
    }

    /// Settings store for the configured directory
    pub fn settings_store(&self) -> Result<SettingsStore> {
        match &self.settings.dir {
            Some(dir) => Ok(SettingsStore::new_with_dir(dir)),
            None => SettingsStore::new(),
        }
    }

    /// Local backend wired to the configured storage locations
    pub fn backend(&self) -> Result<LocalBackend> {
        Ok(LocalBackend::new(self.open_storage()?, self.settings_store()?)
            .with_recent_projects_cap(self.projects.recent_cap))
    }
}
