//! View models driving the history and settings screens

pub mod chat_history;
pub mod settings_panel;

pub use chat_history::ChatHistoryView;
pub use settings_panel::{AgentSettingsPanel, AppSettingsPanel, EditableSettings, SettingsPanel};
