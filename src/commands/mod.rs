//! Command handlers for the CLI
//!
//! - `history`: browse, edit, export and import chat history
//! - `settings`: show and change application and agent settings
//! - `projects`: recent projects list
//! - `prompts`: prompt template library

pub mod history;
pub mod projects;
pub mod prompts;
pub mod settings;
