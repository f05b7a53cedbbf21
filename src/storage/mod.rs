use crate::chat::{extract_file_mentions, ChatMessage};
use crate::error::{CommanderError, Result};
use crate::projects::{upsert_recent_projects, RecentProject};
use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{HistoryProject, LegacyChatMessage, StoredMessage, LEGACY_DEFAULT_AGENT};

/// Environment variable overriding the history database location
pub const HISTORY_DB_ENV: &str = "COMMANDER_HISTORY_DB";

/// Storage backend for chat transcripts and the recent projects list
///
/// Sessions are never stored: they are derived from the message rows on
/// every load.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a new storage instance
    ///
    /// Initializes the database file in the user's data directory unless
    /// `COMMANDER_HISTORY_DB` points elsewhere.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var(HISTORY_DB_ENV) {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("dev", "commander", "commander")
            .ok_or_else(|| CommanderError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("history.db"))
    }

    /// Create a new storage instance that uses the specified database path.
    ///
    /// # Examples
    ///
    /// ```
    /// use commander::storage::SqliteStorage;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let storage = SqliteStorage::new_with_path(dir.path().join("history.db")).unwrap();
    /// assert!(storage.db_path().exists());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| CommanderError::Storage(e.to_string()))?;
        }

        let storage = Self { db_path };
        storage.init()?;
        tracing::debug!(path = %storage.db_path.display(), "History storage ready");
        Ok(storage)
    }

    /// Location of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| CommanderError::Storage(e.to_string()))?)
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS chat_messages (
                id TEXT PRIMARY KEY,
                project_path TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                agent TEXT,
                file_mentions JSON NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_chat_messages_project_ts
                ON chat_messages (project_path, timestamp);
            CREATE TABLE IF NOT EXISTS recent_projects (
                path TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                last_accessed INTEGER NOT NULL
            );",
        )
        .context("Failed to create tables")
        .map_err(|e| CommanderError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Append one message to a project's transcript, returning its row id
    pub fn append_message(&self, project_path: &str, message: &ChatMessage) -> Result<String> {
        let mut ids = self.insert_messages(project_path, std::slice::from_ref(message))?;
        ids.pop()
            .ok_or_else(|| CommanderError::Storage("Insert returned no id".into()).into())
    }

    /// Append several messages in one transaction
    pub fn append_messages(&self, project_path: &str, messages: &[ChatMessage]) -> Result<usize> {
        Ok(self.insert_messages(project_path, messages)?.len())
    }

    fn insert_messages(&self, project_path: &str, messages: &[ChatMessage]) -> Result<Vec<String>> {
        let mut conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let mut ids = Vec::with_capacity(messages.len());
        for message in messages {
            let id = uuid::Uuid::new_v4().to_string();
            let mentions_json = serde_json::to_string(&extract_file_mentions(&message.content))
                .context("Failed to serialize file mentions")
                .map_err(|e| CommanderError::Storage(e.to_string()))?;

            tx.execute(
                "INSERT INTO chat_messages
                    (id, project_path, role, content, timestamp, agent, file_mentions, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    project_path,
                    message.role,
                    message.content,
                    message.timestamp,
                    message.agent,
                    mentions_json,
                    now
                ],
            )
            .context("Failed to insert message")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;
            ids.push(id);
        }

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        tracing::debug!(project = %project_path, count = ids.len(), "Appended chat messages");
        Ok(ids)
    }

    /// Load a project's transcript in chronological order
    pub fn load_messages(&self, project_path: &str) -> Result<Vec<ChatMessage>> {
        Ok(self
            .load_stored_messages(project_path)?
            .into_iter()
            .map(|stored| stored.message)
            .collect())
    }

    /// Load a project's transcript with row ids and file mentions
    ///
    /// Ties on `timestamp` keep insertion order.
    pub fn load_stored_messages(&self, project_path: &str) -> Result<Vec<StoredMessage>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, project_path, role, content, timestamp, agent, file_mentions
                FROM chat_messages
                WHERE project_path = ?
                ORDER BY timestamp ASC, rowid ASC",
            )
            .context("Failed to prepare statement")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map(params![project_path], stored_message_from_row)
            .context("Failed to query messages")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(
                row.context("Failed to read message row")
                    .map_err(|e| CommanderError::Storage(e.to_string()))?,
            );
        }

        Ok(messages)
    }

    /// Delete a project's messages with `from <= timestamp <= to`
    pub fn delete_messages_between(&self, project_path: &str, from: i64, to: i64) -> Result<usize> {
        let conn = self.open()?;
        let deleted = conn
            .execute(
                "DELETE FROM chat_messages
                WHERE project_path = ? AND timestamp >= ? AND timestamp <= ?",
                params![project_path, from, to],
            )
            .context("Failed to delete messages")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        tracing::info!(project = %project_path, from, to, deleted, "Deleted chat messages");
        Ok(deleted)
    }

    /// Delete the given rows of a project's transcript
    ///
    /// Ids belonging to another project are ignored.
    pub fn delete_messages_by_id(&self, project_path: &str, ids: &[String]) -> Result<usize> {
        let mut conn = self.open()?;
        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let mut deleted = 0;
        for id in ids {
            deleted += tx
                .execute(
                    "DELETE FROM chat_messages WHERE project_path = ? AND id = ?",
                    params![project_path, id],
                )
                .context("Failed to delete message")
                .map_err(|e| CommanderError::Storage(e.to_string()))?;
        }

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        tracing::info!(project = %project_path, deleted, "Deleted chat messages by id");
        Ok(deleted)
    }

    /// Delete a project's entire transcript
    pub fn clear_project(&self, project_path: &str) -> Result<usize> {
        let conn = self.open()?;
        let deleted = conn
            .execute(
                "DELETE FROM chat_messages WHERE project_path = ?",
                params![project_path],
            )
            .context("Failed to clear project history")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        tracing::info!(project = %project_path, deleted, "Cleared chat history");
        Ok(deleted)
    }

    /// Projects that have stored history, most recently active first
    pub fn list_history_projects(&self) -> Result<Vec<HistoryProject>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(
                "SELECT project_path, COUNT(*), MAX(timestamp)
                FROM chat_messages
                GROUP BY project_path
                ORDER BY MAX(timestamp) DESC",
            )
            .context("Failed to prepare statement")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok(HistoryProject {
                    path: row.get(0)?,
                    message_count: count.max(0) as usize,
                    last_timestamp: row.get(2)?,
                })
            })
            .context("Failed to query projects")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(
                row.context("Failed to read project row")
                    .map_err(|e| CommanderError::Storage(e.to_string()))?,
            );
        }
        Ok(projects)
    }

    /// Import a legacy JSON transcript file into `project_path`
    ///
    /// Returns the number of imported messages. An empty array is a no-op.
    pub fn import_legacy(&self, project_path: &str, file: &Path) -> Result<usize> {
        let contents = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read legacy transcript {}", file.display()))?;
        let legacy: Vec<LegacyChatMessage> = serde_json::from_str(&contents)
            .map_err(CommanderError::from)
            .with_context(|| format!("Failed to parse legacy transcript {}", file.display()))?;

        if legacy.is_empty() {
            return Ok(0);
        }

        let mut messages: Vec<ChatMessage> = legacy.into_iter().map(ChatMessage::from).collect();
        // Stable sort keeps file order for equal timestamps.
        messages.sort_by_key(|m| m.timestamp);

        let imported = self.append_messages(project_path, &messages)?;
        tracing::info!(project = %project_path, imported, "Imported legacy transcript");
        Ok(imported)
    }

    /// Record a project access and keep the list capped at `cap` entries
    pub fn upsert_recent_project(&self, project: RecentProject, cap: usize) -> Result<Vec<RecentProject>> {
        let updated = upsert_recent_projects(self.list_recent_projects()?, project, cap);

        let mut conn = self.open()?;
        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        tx.execute("DELETE FROM recent_projects", [])
            .context("Failed to reset recent projects")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        for p in &updated {
            tx.execute(
                "INSERT INTO recent_projects (path, name, last_accessed) VALUES (?, ?, ?)",
                params![p.path, p.name, p.last_accessed],
            )
            .context("Failed to insert recent project")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;
        }

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        Ok(updated)
    }

    /// Recent projects, most recently accessed first
    pub fn list_recent_projects(&self) -> Result<Vec<RecentProject>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(
                "SELECT path, name, last_accessed
                FROM recent_projects
                ORDER BY last_accessed DESC",
            )
            .context("Failed to prepare statement")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RecentProject {
                    path: row.get(0)?,
                    name: row.get(1)?,
                    last_accessed: row.get(2)?,
                })
            })
            .context("Failed to query recent projects")
            .map_err(|e| CommanderError::Storage(e.to_string()))?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(
                row.context("Failed to read recent project row")
                    .map_err(|e| CommanderError::Storage(e.to_string()))?,
            );
        }
        Ok(projects)
    }
}

fn stored_message_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    let mentions_json: String = row.get(6)?;
    // A corrupt mentions column should not hide the message itself.
    let file_mentions = serde_json::from_str(&mentions_json).unwrap_or_default();

    Ok(StoredMessage {
        id: row.get(0)?,
        project_path: row.get(1)?,
        message: ChatMessage {
            role: row.get(2)?,
            content: row.get(3)?,
            timestamp: row.get(4)?,
            agent: row.get(5)?,
        },
        file_mentions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::tempdir;

    /// Helper: create a temporary storage instance backed by a temp directory.
    fn create_test_storage() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("history.db");
        let storage = SqliteStorage::new_with_path(db_path).expect("failed to create storage");
        (storage, dir)
    }

    #[test]
    fn test_init_creates_tables() {
        let (storage, _dir) = create_test_storage();
        let conn = Connection::open(storage.db_path()).expect("open connection");
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table'
                AND name IN ('chat_messages', 'recent_projects')",
                [],
                |r| r.get(0),
            )
            .expect("query row");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_append_and_load_preserves_order() {
        let (storage, _dir) = create_test_storage();
        let messages = vec![
            ChatMessage::user("first", 100).with_agent("claude"),
            ChatMessage::assistant("second", 100).with_agent("claude"),
            ChatMessage::user("third", 200),
        ];
        storage.append_messages("/proj", &messages).expect("append failed");

        let loaded = storage.load_messages("/proj").expect("load failed");
        assert_eq!(loaded, messages);
    }

    #[test]
    fn test_load_is_scoped_to_project() {
        let (storage, _dir) = create_test_storage();
        storage
            .append_message("/a", &ChatMessage::user("in a", 1))
            .expect("append a");
        storage
            .append_message("/b", &ChatMessage::user("in b", 2))
            .expect("append b");

        let loaded = storage.load_messages("/a").expect("load failed");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].content, "in a");
    }

    #[test]
    fn test_load_unknown_project_is_empty() {
        let (storage, _dir) = create_test_storage();
        assert!(storage.load_messages("/nothing").expect("load").is_empty());
    }

    #[test]
    fn test_file_mentions_are_stored() {
        let (storage, _dir) = create_test_storage();
        let id = storage
            .append_message("/p", &ChatMessage::user("look at src/lib.rs", 1))
            .expect("append failed");

        let stored = storage.load_stored_messages("/p").expect("load failed");
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].file_mentions, vec!["src/lib.rs".to_string()]);
    }

    #[test]
    fn test_delete_messages_between_is_inclusive() {
        let (storage, _dir) = create_test_storage();
        let messages: Vec<ChatMessage> = (0..5).map(|i| ChatMessage::user("m", i * 10)).collect();
        storage.append_messages("/p", &messages).expect("append failed");

        let deleted = storage.delete_messages_between("/p", 10, 30).expect("delete failed");
        assert_eq!(deleted, 3);

        let left: Vec<i64> = storage
            .load_messages("/p")
            .expect("load")
            .iter()
            .map(|m| m.timestamp)
            .collect();
        assert_eq!(left, vec![0, 40]);
    }

    #[test]
    fn test_delete_messages_by_id_spares_same_timestamp_rows() {
        let (storage, _dir) = create_test_storage();
        storage
            .append_messages(
                "/p",
                &[
                    ChatMessage::user("claude side", 5_000).with_agent("claude"),
                    ChatMessage::user("codex side", 5_000).with_agent("codex"),
                ],
            )
            .expect("append failed");
        let other = storage
            .append_message("/other", &ChatMessage::user("elsewhere", 5_000))
            .expect("append other");

        let stored = storage.load_stored_messages("/p").expect("load");
        let ids = vec![stored[1].id.clone(), other];
        assert_eq!(storage.delete_messages_by_id("/p", &ids).expect("delete"), 1);

        let left = storage.load_messages("/p").expect("load");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].content, "claude side");
        assert_eq!(storage.load_messages("/other").expect("load").len(), 1);
    }

    #[test]
    fn test_unreadable_recent_project_row_is_an_error() {
        let (storage, _dir) = create_test_storage();
        storage
            .upsert_recent_project(RecentProject::from_path("/kept", 10), 20)
            .expect("upsert");
        let conn = Connection::open(storage.db_path()).expect("open connection");
        conn.execute(
            "INSERT INTO recent_projects (path, name, last_accessed) VALUES ('/bad', 'bad', 'soon')",
            [],
        )
        .expect("insert bad row");

        assert!(storage.list_recent_projects().is_err());
        assert!(storage
            .upsert_recent_project(RecentProject::from_path("/new", 20), 20)
            .is_err());

        let paths: Vec<String> = conn
            .prepare("SELECT path FROM recent_projects ORDER BY path")
            .expect("prepare")
            .query_map([], |r| r.get(0))
            .expect("query")
            .collect::<rusqlite::Result<_>>()
            .expect("collect");
        assert_eq!(paths, vec!["/bad".to_string(), "/kept".to_string()]);
    }

    #[test]
    fn test_unreadable_history_row_is_an_error() {
        let (storage, _dir) = create_test_storage();
        let conn = Connection::open(storage.db_path()).expect("open connection");
        conn.execute(
            "INSERT INTO chat_messages (id, project_path, role, content, timestamp, created_at)
            VALUES ('x', '/p', 'user', 'hi', 'later', 'now')",
            [],
        )
        .expect("insert bad row");

        assert!(storage.list_history_projects().is_err());
    }

    #[test]
    fn test_clear_project() {
        let (storage, _dir) = create_test_storage();
        storage
            .append_messages("/p", &[ChatMessage::user("a", 1), ChatMessage::user("b", 2)])
            .expect("append");
        storage
            .append_message("/other", &ChatMessage::user("c", 3))
            .expect("append");

        assert_eq!(storage.clear_project("/p").expect("clear"), 2);
        assert!(storage.load_messages("/p").expect("load").is_empty());
        assert_eq!(storage.load_messages("/other").expect("load").len(), 1);
    }

    #[test]
    fn test_list_history_projects() {
        let (storage, _dir) = create_test_storage();
        storage
            .append_messages("/old", &[ChatMessage::user("a", 1), ChatMessage::user("b", 2)])
            .expect("append");
        storage
            .append_message("/new", &ChatMessage::user("c", 50))
            .expect("append");

        let projects = storage.list_history_projects().expect("list");
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].path, "/new");
        assert_eq!(projects[1].message_count, 2);
        assert_eq!(projects[1].last_timestamp, 2);
    }

    #[test]
    fn test_import_legacy_defaults_agent() {
        let (storage, dir) = create_test_storage();
        let file = dir.path().join("chat.json");
        std::fs::write(
            &file,
            r#"[
                {"role":"user","content":"hi","timestamp":20},
                {"role":"assistant","content":"yo","timestamp":10,"agent":"codex"}
            ]"#,
        )
        .expect("write legacy");

        let imported = storage.import_legacy("/p", &file).expect("import failed");
        assert_eq!(imported, 2);

        let loaded = storage.load_messages("/p").expect("load");
        assert_eq!(loaded[0].agent.as_deref(), Some("codex"));
        assert_eq!(loaded[1].agent.as_deref(), Some(LEGACY_DEFAULT_AGENT));
    }

    #[test]
    fn test_import_legacy_rejects_garbage() {
        let (storage, dir) = create_test_storage();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, "not json").expect("write");
        assert!(storage.import_legacy("/p", &file).is_err());
    }

    #[test]
    fn test_recent_projects_roundtrip_and_cap() {
        let (storage, _dir) = create_test_storage();
        for i in 0..4 {
            storage
                .upsert_recent_project(RecentProject::from_path(&format!("/p{i}"), i), 3)
                .expect("upsert");
        }

        let projects = storage.list_recent_projects().expect("list");
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].path, "/p3");
        assert_eq!(projects[2].path, "/p1");
    }

    #[test]
    #[serial]
    fn test_new_respects_env_override() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("nested").join("history.db");
        env::set_var(HISTORY_DB_ENV, db_path.to_string_lossy().to_string());

        let storage = SqliteStorage::new().expect("new failed with env override");
        assert_eq!(storage.db_path(), db_path.as_path());
        assert!(db_path.parent().unwrap().exists());

        env::remove_var(HISTORY_DB_ENV);
    }
}
