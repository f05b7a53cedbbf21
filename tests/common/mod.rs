use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use commander::backend::LocalBackend;
use commander::chat::ChatMessage;
use commander::settings::SettingsStore;
use commander::storage::SqliteStorage;

#[allow(dead_code)]
pub fn create_temp_storage() -> (SqliteStorage, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("history.db");
    let storage =
        SqliteStorage::new_with_path(db_path).expect("failed to create sqlite storage with path");
    (storage, tmp)
}

#[allow(dead_code)]
pub fn create_temp_backend() -> (LocalBackend, TempDir) {
    let (storage, tmp) = create_temp_storage();
    let settings = SettingsStore::new_with_dir(tmp.path().join("settings"));
    (LocalBackend::new(storage, settings), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn msg(role: &str, content: &str, timestamp: i64, agent: Option<&str>) -> ChatMessage {
    let message = ChatMessage::new(role, content, timestamp);
    match agent {
        Some(agent) => message.with_agent(agent),
        None => message,
    }
}
