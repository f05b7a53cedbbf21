//! Session list for one project's chat history

use crate::backend::{Backend, DeleteChatMessagesRequest, LoadChatRequest, LoadGuard, LoadTicket};
use crate::chat::{is_expired, ChatMessage, ChatSession, Segmenter};
use crate::error::{CommanderError, Result};
use crate::storage::StoredMessage;

/// Segmented history of a project with an optional drill-down selection
///
/// Loads through [`ChatHistoryView::refresh`] are best effort: a failed read
/// shows an empty history instead of an error. Results of a load that was
/// superseded by a newer one, or that finished after
/// [`ChatHistoryView::teardown`], are dropped.
///
/// Each session remembers the row ids of its messages, so deleting a
/// session removes exactly those rows even when a neighbouring session
/// shares a timestamp.
#[derive(Debug, Default)]
pub struct ChatHistoryView {
    guard: LoadGuard,
    segmenter: Segmenter,
    sessions: Vec<ChatSession>,
    row_ids: Vec<Vec<String>>,
    selected: Option<usize>,
}

impl ChatHistoryView {
    pub fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            ..Self::default()
        }
    }

    /// Sessions, most recently started first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Handle on the view's load generation counter
    pub fn load_guard(&self) -> LoadGuard {
        self.guard.clone()
    }

    /// Reload the project's transcript and re-segment it
    ///
    /// Returns whether the result was applied.
    pub async fn refresh(&mut self, backend: &dyn Backend, project_path: &str) -> bool {
        let ticket = self.begin_load();

        let rows = match backend.load_stored_messages(&load_request(project_path)).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(project = %project_path, error = %e, "Failed to load chat history");
                Vec::new()
            }
        };

        self.apply_loaded(ticket, &rows)
    }

    /// Reload like [`ChatHistoryView::refresh`], but return load failures
    pub async fn try_refresh(&mut self, backend: &dyn Backend, project_path: &str) -> Result<bool> {
        let ticket = self.begin_load();
        let rows = backend
            .load_stored_messages(&load_request(project_path))
            .await?;
        Ok(self.apply_loaded(ticket, &rows))
    }

    /// Start a load, superseding any in flight
    pub fn begin_load(&self) -> LoadTicket {
        self.guard.begin()
    }

    /// Apply loaded rows if `ticket` is still the newest load
    ///
    /// The selection survives when its session is still present.
    pub fn apply_loaded(&mut self, ticket: LoadTicket, rows: &[StoredMessage]) -> bool {
        if !self.guard.is_current(&ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "Discarding stale chat history load"
            );
            return false;
        }

        let anchor = self
            .selected
            .and_then(|i| self.row_ids.get(i))
            .and_then(|ids| ids.first().cloned());

        let messages: Vec<ChatMessage> = rows.iter().map(|r| r.message.clone()).collect();
        self.sessions = self.segmenter.segment(&messages);

        // Sessions come newest first; ids are handed out chronologically.
        let mut ids = rows.iter().map(|r| r.id.clone());
        self.row_ids = self
            .sessions
            .iter()
            .rev()
            .map(|s| ids.by_ref().take(s.message_count()).collect())
            .collect();
        self.row_ids.reverse();

        self.selected = anchor.and_then(|first| {
            self.row_ids
                .iter()
                .position(|ids| ids.first() == Some(&first))
        });

        tracing::debug!(sessions = self.sessions.len(), "Chat history updated");
        true
    }

    /// Select the newest session starting at `start`; false if there is none
    pub fn select(&mut self, start: i64) -> bool {
        self.selected = self.sessions.iter().position(|s| s.start == start);
        self.selected.is_some()
    }

    /// Select by position in [`ChatHistoryView::sessions`]
    pub fn select_index(&mut self, index: usize) -> bool {
        self.selected = (index < self.sessions.len()).then_some(index);
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&ChatSession> {
        self.sessions.get(self.selected?)
    }

    /// Delete the selected session's messages, then re-read the history
    ///
    /// Returns the number of deleted messages.
    pub async fn delete_selected(
        &mut self,
        backend: &dyn Backend,
        project_path: &str,
    ) -> Result<usize> {
        let Some(ids) = self.selected.and_then(|i| self.row_ids.get(i)) else {
            return Err(CommanderError::InvalidInput("no session selected".to_string()).into());
        };

        let request = DeleteChatMessagesRequest {
            project_path: project_path.to_string(),
            ids: ids.clone(),
        };

        let deleted = backend.delete_chat_messages(&request).await?;
        tracing::info!(project = %project_path, deleted, "Deleted chat session");

        self.selected = None;
        self.refresh(backend, project_path).await;
        Ok(deleted)
    }

    /// Delete every session whose last message is older than `cutoff_ms`
    ///
    /// Returns the number of deleted sessions.
    pub async fn delete_expired(
        &mut self,
        backend: &dyn Backend,
        project_path: &str,
        cutoff_ms: i64,
    ) -> Result<usize> {
        let mut sessions = 0;
        let mut ids = Vec::new();
        for (session, rows) in self.sessions.iter().zip(&self.row_ids) {
            if is_expired(session, cutoff_ms) {
                sessions += 1;
                ids.extend(rows.iter().cloned());
            }
        }

        if sessions == 0 {
            return Ok(0);
        }

        let request = DeleteChatMessagesRequest {
            project_path: project_path.to_string(),
            ids,
        };
        let deleted = backend.delete_chat_messages(&request).await?;
        tracing::info!(project = %project_path, sessions, deleted, "Deleted expired chat sessions");

        self.refresh(backend, project_path).await;
        Ok(sessions)
    }

    /// Invalidate loads still in flight
    pub fn teardown(&mut self) {
        self.guard.teardown();
    }
}

fn load_request(project_path: &str) -> LoadChatRequest {
    LoadChatRequest {
        project_path: project_path.to_string(),
    }
}
