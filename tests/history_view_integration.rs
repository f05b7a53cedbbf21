//! Integration tests for the chat history view over the local backend
//!
//! Covers the load, drill-down, delete-then-reread workflow against a real
//! SQLite file, plus the failure and stale-result paths.

mod common;

use async_trait::async_trait;
use commander::backend::{
    AppendChatRequest, Backend, DeleteChatMessagesRequest, DeleteChatRangeRequest,
    LoadChatRequest, LoadGuard, OpenProjectRequest,
};
use commander::chat::{retention_cutoff, ChatMessage, Segmenter, DAY_MS};
use commander::error::Result;
use commander::projects::RecentProject;
use commander::prompts::PromptsConfig;
use commander::settings::{AllAgentSettings, AppSettings};
use commander::storage::StoredMessage;
use commander::ChatHistoryView;
use common::{create_temp_backend, msg};

const PROJECT: &str = "/home/dev/widget";

async fn seed(backend: &dyn Backend, messages: Vec<ChatMessage>) {
    for message in messages {
        backend
            .append_chat_message(&AppendChatRequest {
                project_path: PROJECT.to_string(),
                message,
            })
            .await
            .expect("failed to append message");
    }
}

fn two_sessions() -> Vec<ChatMessage> {
    vec![
        msg("user", "refactor src/lib.rs please", 1_000, Some("claude")),
        msg("assistant", "done, see src/lib.rs", 2_000, Some("claude")),
        msg("user", "now add tests", 10_000_000, Some("claude")),
        msg("assistant", "added tests/api.rs", 10_001_000, Some("claude")),
    ]
}

#[tokio::test]
async fn test_refresh_reads_and_segments_stored_history() {
    let (backend, _tmp) = create_temp_backend();
    seed(&backend, two_sessions()).await;

    let mut view = ChatHistoryView::default();
    assert!(view.refresh(&backend, PROJECT).await);

    let sessions = view.sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].summary, "now add tests");
    assert_eq!(sessions[1].summary, "refactor src/lib.rs please");
    assert_eq!(sessions[1].message_count(), 2);
}

#[tokio::test]
async fn test_other_projects_are_not_mixed_in() {
    let (backend, _tmp) = create_temp_backend();
    seed(&backend, two_sessions()).await;
    backend
        .append_chat_message(&AppendChatRequest {
            project_path: "/elsewhere".to_string(),
            message: msg("user", "unrelated", 1_500, Some("codex")),
        })
        .await
        .unwrap();

    let mut view = ChatHistoryView::default();
    view.refresh(&backend, PROJECT).await;
    assert_eq!(view.sessions().len(), 2);
}

#[tokio::test]
async fn test_delete_selected_session_rereads_history() {
    let (backend, _tmp) = create_temp_backend();
    seed(&backend, two_sessions()).await;

    let mut view = ChatHistoryView::new(Segmenter::default());
    view.refresh(&backend, PROJECT).await;
    assert!(view.select(1_000));

    let deleted = view.delete_selected(&backend, PROJECT).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(view.sessions().len(), 1);
    assert_eq!(view.sessions()[0].start, 10_000_000);
    assert!(view.selected().is_none());

    let remaining = backend
        .load_chat_messages(&LoadChatRequest {
            project_path: PROJECT.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);
}

#[tokio::test]
async fn test_deleting_one_of_two_sessions_sharing_a_start_keeps_the_other() {
    let (backend, _tmp) = create_temp_backend();
    seed(
        &backend,
        vec![
            msg("user", "claude side", 5_000, Some("claude")),
            msg("user", "codex side", 5_000, Some("codex")),
            msg("assistant", "codex reply", 6_000, Some("codex")),
        ],
    )
    .await;

    let mut view = ChatHistoryView::default();
    view.refresh(&backend, PROJECT).await;
    assert_eq!(view.sessions().len(), 2);
    assert!(view.sessions().iter().all(|s| s.start == 5_000));

    let claude = view
        .sessions()
        .iter()
        .position(|s| s.agent.as_deref() == Some("claude"))
        .unwrap();
    assert!(view.select_index(claude));
    assert_eq!(view.delete_selected(&backend, PROJECT).await.unwrap(), 1);

    assert_eq!(view.sessions().len(), 1);
    assert_eq!(view.sessions()[0].agent.as_deref(), Some("codex"));
    assert_eq!(view.sessions()[0].message_count(), 2);
}

#[tokio::test]
async fn test_delete_expired_keeps_recent_sessions() {
    let (backend, _tmp) = create_temp_backend();
    let now = 100 * DAY_MS;
    seed(
        &backend,
        vec![
            msg("user", "old work", now - 40 * DAY_MS, Some("claude")),
            msg("user", "recent work", now - DAY_MS, Some("claude")),
        ],
    )
    .await;

    let mut view = ChatHistoryView::default();
    view.try_refresh(&backend, PROJECT).await.unwrap();
    let deleted = view
        .delete_expired(&backend, PROJECT, retention_cutoff(now, 30))
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(view.sessions().len(), 1);
    assert_eq!(view.sessions()[0].summary, "recent work");
}

#[tokio::test]
async fn test_empty_project_path_shows_empty_history() {
    let (backend, _tmp) = create_temp_backend();
    let mut view = ChatHistoryView::default();
    assert!(view.refresh(&backend, "").await);
    assert!(view.sessions().is_empty());
}

/// Backend whose transcript load completes only after the owning view was
/// torn down, as happens when the user navigates away mid-load.
struct TearingBackend {
    guard: LoadGuard,
    messages: Vec<ChatMessage>,
}

#[async_trait]
impl Backend for TearingBackend {
    async fn load_chat_messages(&self, _request: &LoadChatRequest) -> Result<Vec<ChatMessage>> {
        unimplemented!()
    }

    async fn load_stored_messages(&self, request: &LoadChatRequest) -> Result<Vec<StoredMessage>> {
        self.guard.teardown();
        Ok(self
            .messages
            .iter()
            .enumerate()
            .map(|(i, message)| StoredMessage {
                id: format!("row-{}", i),
                project_path: request.project_path.clone(),
                message: message.clone(),
                file_mentions: Vec::new(),
            })
            .collect())
    }

    async fn append_chat_message(&self, _request: &AppendChatRequest) -> Result<String> {
        unimplemented!()
    }

    async fn delete_chat_range(&self, _request: &DeleteChatRangeRequest) -> Result<usize> {
        unimplemented!()
    }

    async fn delete_chat_messages(&self, _request: &DeleteChatMessagesRequest) -> Result<usize> {
        unimplemented!()
    }

    async fn load_app_settings(&self) -> Result<AppSettings> {
        unimplemented!()
    }

    async fn save_app_settings(&self, _settings: &AppSettings) -> Result<()> {
        unimplemented!()
    }

    async fn load_agent_settings(&self) -> Result<AllAgentSettings> {
        unimplemented!()
    }

    async fn save_agent_settings(&self, _settings: &AllAgentSettings) -> Result<()> {
        unimplemented!()
    }

    async fn load_prompts(&self) -> Result<PromptsConfig> {
        unimplemented!()
    }

    async fn save_prompts(&self, _prompts: &PromptsConfig) -> Result<()> {
        unimplemented!()
    }

    async fn list_recent_projects(&self) -> Result<Vec<RecentProject>> {
        unimplemented!()
    }

    async fn open_project(&self, _request: &OpenProjectRequest) -> Result<RecentProject> {
        unimplemented!()
    }
}

#[tokio::test]
async fn test_result_arriving_after_teardown_is_dropped() {
    let mut view = ChatHistoryView::default();
    let backend = TearingBackend {
        guard: view.load_guard(),
        messages: two_sessions(),
    };

    assert!(!view.refresh(&backend, PROJECT).await);
    assert!(view.sessions().is_empty());
}

#[tokio::test]
async fn test_newer_load_wins_over_older_one() {
    let (backend, _tmp) = create_temp_backend();
    seed(&backend, two_sessions()).await;

    let mut view = ChatHistoryView::default();
    let older = view.begin_load();
    assert!(view.refresh(&backend, PROJECT).await);

    assert!(!view.apply_loaded(older, &[]));
    assert_eq!(view.sessions().len(), 2);
}
