//! Typed backend client
//!
//! Every logical operation the UI can request is one method on [`Backend`]
//! with concrete request and response types. [`LocalBackend`] serves them
//! from the SQLite history store and the settings files.

pub mod guard;

pub use guard::{LoadGuard, LoadTicket};

use crate::chat::ChatMessage;
use crate::error::{CommanderError, Result};
use crate::projects::{RecentProject, DEFAULT_RECENT_PROJECTS_CAP};
use crate::prompts::PromptsConfig;
use crate::settings::{AllAgentSettings, AppSettings, SettingsStore};
use crate::storage::{SqliteStorage, StoredMessage};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Request for a project's full transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadChatRequest {
    pub project_path: String,
}

/// Request to append one message to a project's transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendChatRequest {
    pub project_path: String,
    pub message: ChatMessage,
}

/// Request to delete messages with `from <= timestamp <= to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteChatRangeRequest {
    pub project_path: String,
    pub from: i64,
    pub to: i64,
}

/// Request to delete specific transcript rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteChatMessagesRequest {
    pub project_path: String,
    /// Row ids as returned by [`Backend::load_stored_messages`]
    pub ids: Vec<String>,
}

/// Request to record that a project was opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenProjectRequest {
    pub path: String,
}

/// Native host operations used by the views
///
/// # Examples
///
/// ```no_run
/// use commander::backend::{Backend, LoadChatRequest, LocalBackend};
///
/// # async fn run() -> commander::error::Result<()> {
/// let backend = LocalBackend::from_env()?;
/// let messages = backend
///     .load_chat_messages(&LoadChatRequest { project_path: "/code/app".into() })
///     .await?;
/// println!("{} messages", messages.len());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Load a project's transcript in chronological order
    async fn load_chat_messages(&self, request: &LoadChatRequest) -> Result<Vec<ChatMessage>>;

    /// Same transcript as `load_chat_messages`, with row ids
    async fn load_stored_messages(&self, request: &LoadChatRequest) -> Result<Vec<StoredMessage>>;

    /// Append a message, returning the new row id
    async fn append_chat_message(&self, request: &AppendChatRequest) -> Result<String>;

    /// Delete a timestamp range, returning how many messages went away
    async fn delete_chat_range(&self, request: &DeleteChatRangeRequest) -> Result<usize>;

    /// Delete rows by id, returning how many existed
    async fn delete_chat_messages(&self, request: &DeleteChatMessagesRequest) -> Result<usize>;

    async fn load_app_settings(&self) -> Result<AppSettings>;

    async fn save_app_settings(&self, settings: &AppSettings) -> Result<()>;

    async fn load_agent_settings(&self) -> Result<AllAgentSettings>;

    async fn save_agent_settings(&self, settings: &AllAgentSettings) -> Result<()>;

    async fn load_prompts(&self) -> Result<PromptsConfig>;

    async fn save_prompts(&self, prompts: &PromptsConfig) -> Result<()>;

    /// Recent projects, most recently opened first
    async fn list_recent_projects(&self) -> Result<Vec<RecentProject>>;

    /// Record a project open and return its refreshed entry
    async fn open_project(&self, request: &OpenProjectRequest) -> Result<RecentProject>;
}

/// Backend running in-process over local storage
#[derive(Debug, Clone)]
pub struct LocalBackend {
    storage: SqliteStorage,
    settings: SettingsStore,
    recent_projects_cap: usize,
}

impl LocalBackend {
    pub fn new(storage: SqliteStorage, settings: SettingsStore) -> Self {
        Self {
            storage,
            settings,
            recent_projects_cap: DEFAULT_RECENT_PROJECTS_CAP,
        }
    }

    /// Backend over the default (or env-overridden) storage locations
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(SqliteStorage::new()?, SettingsStore::new()?))
    }

    /// Limit the recent projects list to `cap` entries
    pub fn with_recent_projects_cap(mut self, cap: usize) -> Self {
        self.recent_projects_cap = cap;
        self
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn settings_store(&self) -> &SettingsStore {
        &self.settings
    }

    /// Run blocking storage work off the async runtime
    async fn blocking<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(SqliteStorage, SettingsStore) -> Result<T> + Send + 'static,
    {
        let storage = self.storage.clone();
        let settings = self.settings.clone();

        let result = tokio::task::spawn_blocking(move || work(storage, settings))
            .await
            .map_err(|e| CommanderError::backend(operation, e.to_string()))?;

        result.map_err(|e| {
            tracing::debug!(operation, error = %e, "Backend operation failed");
            anyhow::Error::from(CommanderError::backend(operation, format!("{:#}", e)))
        })
    }
}

fn require_project(operation: &'static str, project_path: &str) -> Result<()> {
    if project_path.trim().is_empty() {
        return Err(CommanderError::backend(operation, "project path is empty").into());
    }
    Ok(())
}

#[async_trait]
impl Backend for LocalBackend {
    async fn load_chat_messages(&self, request: &LoadChatRequest) -> Result<Vec<ChatMessage>> {
        require_project("load_chat_messages", &request.project_path)?;
        let project = request.project_path.clone();
        self.blocking("load_chat_messages", move |storage, _| {
            storage.load_messages(&project)
        })
        .await
    }

    async fn load_stored_messages(&self, request: &LoadChatRequest) -> Result<Vec<StoredMessage>> {
        require_project("load_stored_messages", &request.project_path)?;
        let project = request.project_path.clone();
        self.blocking("load_stored_messages", move |storage, _| {
            storage.load_stored_messages(&project)
        })
        .await
    }

    async fn append_chat_message(&self, request: &AppendChatRequest) -> Result<String> {
        require_project("append_chat_message", &request.project_path)?;
        let request = request.clone();
        self.blocking("append_chat_message", move |storage, _| {
            storage.append_message(&request.project_path, &request.message)
        })
        .await
    }

    async fn delete_chat_range(&self, request: &DeleteChatRangeRequest) -> Result<usize> {
        require_project("delete_chat_range", &request.project_path)?;
        if request.from > request.to {
            return Err(CommanderError::backend(
                "delete_chat_range",
                format!("invalid range {}..={}", request.from, request.to),
            )
            .into());
        }
        let request = request.clone();
        self.blocking("delete_chat_range", move |storage, _| {
            storage.delete_messages_between(&request.project_path, request.from, request.to)
        })
        .await
    }

    async fn delete_chat_messages(&self, request: &DeleteChatMessagesRequest) -> Result<usize> {
        require_project("delete_chat_messages", &request.project_path)?;
        if request.ids.is_empty() {
            return Ok(0);
        }
        let request = request.clone();
        self.blocking("delete_chat_messages", move |storage, _| {
            storage.delete_messages_by_id(&request.project_path, &request.ids)
        })
        .await
    }

    async fn load_app_settings(&self) -> Result<AppSettings> {
        self.blocking("load_app_settings", |_, settings| {
            let mut loaded = settings.load_app_settings()?;
            loaded.normalize();
            Ok(loaded)
        })
        .await
    }

    async fn save_app_settings(&self, settings: &AppSettings) -> Result<()> {
        let value = settings.clone();
        self.blocking("save_app_settings", move |_, store| {
            store.save_app_settings(&value)
        })
        .await
    }

    async fn load_agent_settings(&self) -> Result<AllAgentSettings> {
        self.blocking("load_agent_settings", |_, settings| {
            settings.load_agent_settings()
        })
        .await
    }

    async fn save_agent_settings(&self, settings: &AllAgentSettings) -> Result<()> {
        let value = settings.clone();
        self.blocking("save_agent_settings", move |_, store| {
            store.save_agent_settings(&value)
        })
        .await
    }

    async fn load_prompts(&self) -> Result<PromptsConfig> {
        self.blocking("load_prompts", |_, settings| settings.load_prompts())
            .await
    }

    async fn save_prompts(&self, prompts: &PromptsConfig) -> Result<()> {
        let value = prompts.clone();
        self.blocking("save_prompts", move |_, store| store.save_prompts(&value))
            .await
    }

    async fn list_recent_projects(&self) -> Result<Vec<RecentProject>> {
        self.blocking("list_recent_projects", |storage, _| {
            storage.list_recent_projects()
        })
        .await
    }

    async fn open_project(&self, request: &OpenProjectRequest) -> Result<RecentProject> {
        require_project("open_project", &request.path)?;
        let project = RecentProject::from_path(&request.path, Utc::now().timestamp_millis());
        let cap = self.recent_projects_cap;
        let opened = project.clone();
        self.blocking("open_project", move |storage, _| {
            storage.upsert_recent_project(project, cap)
        })
        .await?;

        tracing::info!(path = %opened.path, "Opened project");
        Ok(opened)
    }
}
