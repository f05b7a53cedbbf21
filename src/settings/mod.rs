//! User settings: models, file persistence and draft editing state

pub mod draft;
pub mod model;
pub mod store;

pub use draft::DraftState;
pub use model::{
    AgentSettings, AllAgentSettings, AppSettings, CodeSettings, ALLOWED_DEFAULT_CLI_AGENTS,
};
pub use store::{SettingsStore, SETTINGS_DIR_ENV};
