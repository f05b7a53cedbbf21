//! JSON-file persistence for application and agent settings

use super::model::{AllAgentSettings, AppSettings};
use crate::error::{CommanderError, Result};
use crate::prompts::PromptsConfig;
use anyhow::Context;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the settings directory
pub const SETTINGS_DIR_ENV: &str = "COMMANDER_SETTINGS_DIR";

const APP_SETTINGS_FILE: &str = "settings.json";
const AGENT_SETTINGS_FILE: &str = "agent-settings.json";
const PROMPTS_FILE: &str = "prompts.json";

/// Reads and writes settings files under one directory
///
/// A missing file is not an error: loads return defaults until the first
/// save creates it.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    /// Store under `COMMANDER_SETTINGS_DIR`, or the platform config dir
    pub fn new() -> Result<Self> {
        let dir = if let Ok(custom) = std::env::var(SETTINGS_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            let proj_dirs = ProjectDirs::from("dev", "commander", "commander")
                .context("Failed to determine project directories")?;
            proj_dirs.config_dir().to_path_buf()
        };
        Ok(Self { dir })
    }

    /// Store rooted at an explicit directory
    pub fn new_with_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the settings files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_app_settings(&self) -> Result<AppSettings> {
        self.read_json(APP_SETTINGS_FILE)
    }

    /// Persist application settings after normalizing them
    pub fn save_app_settings(&self, settings: &AppSettings) -> Result<()> {
        let mut normalized = settings.clone();
        normalized.normalize();
        self.write_json(APP_SETTINGS_FILE, &normalized)
    }

    pub fn load_agent_settings(&self) -> Result<AllAgentSettings> {
        self.read_json(AGENT_SETTINGS_FILE)
    }

    pub fn save_agent_settings(&self, settings: &AllAgentSettings) -> Result<()> {
        self.write_json(AGENT_SETTINGS_FILE, settings)
    }

    /// Prompt templates; the built-in set until the first save
    pub fn load_prompts(&self) -> Result<PromptsConfig> {
        self.read_json(PROMPTS_FILE)
    }

    pub fn save_prompts(&self, prompts: &PromptsConfig) -> Result<()> {
        self.write_json(PROMPTS_FILE, prompts)
    }

    fn read_json<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            tracing::debug!("{} not found, using defaults", path.display());
            return Ok(T::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))
            .map_err(|e| CommanderError::Settings(e.to_string()))?;

        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
            .map_err(|e| CommanderError::Settings(e.to_string()))?;
        Ok(value)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))
            .map_err(|e| CommanderError::Settings(e.to_string()))?;

        let path = self.dir.join(file);
        let contents = serde_json::to_string_pretty(value)?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))
            .map_err(|e| CommanderError::Settings(e.to_string()))?;

        tracing::debug!("Saved {}", path.display());
        Ok(())
    }
}
