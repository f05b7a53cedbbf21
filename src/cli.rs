//! Command-line interface definition for Commander
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat history, settings, prompt templates and
//! recent projects.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Commander - AI coding session manager
///
/// Browse and maintain agent chat history, application settings and the
/// recent projects list.
#[derive(Parser, Debug, Clone)]
#[command(name = "commander")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the history database path
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Commander
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Browse and manage chat history
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Show or change application settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Recently opened projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },

    /// Manage prompt templates
    Prompts {
        #[command(subcommand)]
        command: PromptsCommand,
    },
}

/// Chat history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List sessions of a project, or projects with history when omitted
    List {
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Show the messages of one session
    Show {
        #[arg(short, long)]
        project: String,

        /// Session number, as printed by `history list`
        session: usize,
    },

    /// Append a message to a project's history
    Add {
        #[arg(short, long)]
        project: String,

        /// Message role (user, assistant)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Agent that produced or received the message
        #[arg(short, long)]
        agent: Option<String>,

        /// Timestamp in ms; now when omitted
        #[arg(long)]
        timestamp: Option<i64>,

        /// Message text
        content: String,
    },

    /// Delete one session
    Delete {
        #[arg(short, long)]
        project: String,

        /// Session number, as printed by `history list`
        session: usize,
    },

    /// Find sessions whose summary or messages contain a text
    Search {
        #[arg(short, long)]
        project: String,

        /// Case-insensitive search text
        query: String,

        /// Only sessions of this agent
        #[arg(short, long)]
        agent: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete sessions that ended more than N days ago
    Cleanup {
        #[arg(short, long)]
        project: String,

        /// Retention period in days
        #[arg(short, long)]
        days: u32,
    },

    /// Delete a project's entire history
    Clear {
        #[arg(short, long)]
        project: String,
    },

    /// Summary statistics for a project
    Stats {
        #[arg(short, long)]
        project: String,
    },

    /// Export a project's sessions
    Export {
        #[arg(short, long)]
        project: String,

        /// Output format (json, markdown)
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Include full message metadata (JSON only)
        #[arg(long)]
        metadata: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a legacy JSON transcript
    Import {
        #[arg(short, long)]
        project: String,

        /// JSON array of {role, content, timestamp, agent?}
        file: PathBuf,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print current settings
    Show {
        /// Show agent settings instead of application settings
        #[arg(long)]
        agents: bool,
    },

    /// Change one setting, e.g. `ui_theme dark` or `--agents codex.model gpt-5`
    Set {
        key: String,
        value: String,

        /// Change an agent setting instead of an application setting
        #[arg(long)]
        agents: bool,
    },

    /// Restore defaults
    Reset {
        /// Reset agent settings instead of application settings
        #[arg(long)]
        agents: bool,
    },
}

/// Recent projects subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectsCommand {
    /// List recently opened projects
    List,

    /// Record a project as opened
    Open { path: String },
}

/// Prompt template subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PromptsCommand {
    /// List categories and their prompts
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Print one prompt
    Show { category: String, key: String },

    /// Create or replace a prompt in an existing category
    Set {
        category: String,
        key: String,

        /// Prompt text, with {{variable}} placeholders
        content: String,

        /// Display name; defaults to the key
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a prompt
    Delete { category: String, key: String },

    /// Create a category
    AddCategory {
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Fill in a prompt's variables and print it
    Render {
        category: String,
        key: String,

        /// Variable value as NAME=VALUE; repeatable
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
    },

    /// Restore the built-in prompts
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            command: Commands::Projects {
                command: ProjectsCommand::List,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.storage_path.is_none());
        assert!(matches!(
            cli.command,
            Commands::Projects {
                command: ProjectsCommand::List
            }
        ));
    }

    #[test]
    fn test_cli_parse_history_list_without_project() {
        let cli = Cli::try_parse_from(["commander", "history", "list"]).unwrap();
        if let Commands::History {
            command: HistoryCommand::List { project },
        } = cli.command
        {
            assert!(project.is_none());
        } else {
            panic!("Expected history list");
        }
    }

    #[test]
    fn test_cli_parse_history_add() {
        let cli = Cli::try_parse_from([
            "commander",
            "--storage-path",
            "/tmp/h.db",
            "history",
            "add",
            "-p",
            "/code/app",
            "--agent",
            "codex",
            "fix the build",
        ])
        .unwrap();

        assert_eq!(cli.storage_path.as_deref(), Some("/tmp/h.db"));
        if let Commands::History {
            command:
                HistoryCommand::Add {
                    project,
                    role,
                    agent,
                    timestamp,
                    content,
                },
        } = cli.command
        {
            assert_eq!(project, "/code/app");
            assert_eq!(role, "user");
            assert_eq!(agent.as_deref(), Some("codex"));
            assert!(timestamp.is_none());
            assert_eq!(content, "fix the build");
        } else {
            panic!("Expected history add");
        }
    }

    #[test]
    fn test_cli_parse_history_export() {
        let cli = Cli::try_parse_from([
            "commander", "history", "export", "-p", "/p", "-f", "json", "--metadata",
        ])
        .unwrap();
        if let Commands::History {
            command:
                HistoryCommand::Export {
                    format,
                    metadata,
                    output,
                    ..
                },
        } = cli.command
        {
            assert_eq!(format, "json");
            assert!(metadata);
            assert!(output.is_none());
        } else {
            panic!("Expected history export");
        }
    }

    #[test]
    fn test_cli_history_show_requires_project() {
        assert!(Cli::try_parse_from(["commander", "history", "show", "123"]).is_err());
    }

    #[test]
    fn test_cli_parse_settings_set() {
        let cli =
            Cli::try_parse_from(["commander", "-v", "settings", "set", "ui_theme", "dark"]).unwrap();
        assert!(cli.verbose);
        if let Commands::Settings {
            command: SettingsCommand::Set { key, value, agents },
        } = cli.command
        {
            assert_eq!(key, "ui_theme");
            assert_eq!(value, "dark");
            assert!(!agents);
        } else {
            panic!("Expected settings set");
        }
    }

    #[test]
    fn test_cli_parse_history_search() {
        let cli = Cli::try_parse_from([
            "commander", "history", "search", "-p", "/p", "login", "--agent", "codex", "-l", "3",
        ])
        .unwrap();
        if let Commands::History {
            command:
                HistoryCommand::Search {
                    query,
                    agent,
                    limit,
                    ..
                },
        } = cli.command
        {
            assert_eq!(query, "login");
            assert_eq!(agent.as_deref(), Some("codex"));
            assert_eq!(limit, Some(3));
        } else {
            panic!("Expected history search");
        }
    }

    #[test]
    fn test_cli_parse_history_cleanup_requires_days() {
        assert!(Cli::try_parse_from(["commander", "history", "cleanup", "-p", "/p"]).is_err());
        let cli =
            Cli::try_parse_from(["commander", "history", "cleanup", "-p", "/p", "--days", "30"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::History {
                command: HistoryCommand::Cleanup { days: 30, .. }
            }
        ));
    }

    #[test]
    fn test_cli_parse_prompts_render_vars() {
        let cli = Cli::try_parse_from([
            "commander",
            "prompts",
            "render",
            "code_analysis",
            "review_checklist",
            "--var",
            "code_content=fn main() {}",
            "--var",
            "lang=rust",
        ])
        .unwrap();
        if let Commands::Prompts {
            command: PromptsCommand::Render { vars, .. },
        } = cli.command
        {
            assert_eq!(vars, vec!["code_content=fn main() {}", "lang=rust"]);
        } else {
            panic!("Expected prompts render");
        }
    }

    #[test]
    fn test_cli_parse_settings_reset_agents() {
        let cli = Cli::try_parse_from(["commander", "settings", "reset", "--agents"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                command: SettingsCommand::Reset { agents: true }
            }
        ));
    }

    #[test]
    fn test_cli_parse_projects_open() {
        let cli = Cli::try_parse_from(["commander", "projects", "open", "/code/app"]).unwrap();
        if let Commands::Projects {
            command: ProjectsCommand::Open { path },
        } = cli.command
        {
            assert_eq!(path, "/code/app");
        } else {
            panic!("Expected projects open");
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["commander"]).is_err());
    }
}
