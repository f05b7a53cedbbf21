use crate::backend::Backend;
use crate::cli::SettingsCommand;
use crate::config::Config;
use crate::error::Result;
use crate::settings::{AgentSettings, AllAgentSettings, AppSettings};
use crate::views::{AgentSettingsPanel, AppSettingsPanel, EditableSettings, SettingsPanel};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle settings commands
pub async fn handle_settings(config: &Config, command: SettingsCommand) -> Result<()> {
    let backend = config.backend()?;

    match command {
        SettingsCommand::Show { agents: false } => {
            let mut panel = AppSettingsPanel::new();
            panel.try_load(&backend).await?;
            print_app_settings(panel.committed());
        }
        SettingsCommand::Show { agents: true } => {
            let mut panel = AgentSettingsPanel::new();
            panel.try_load(&backend).await?;
            print_agent_settings(panel.committed());
        }
        SettingsCommand::Set {
            key,
            value,
            agents: false,
        } => set_setting::<AppSettings>(&backend, &key, &value).await?,
        SettingsCommand::Set {
            key,
            value,
            agents: true,
        } => set_setting::<AllAgentSettings>(&backend, &key, &value).await?,
        SettingsCommand::Reset { agents: false } => {
            backend.save_app_settings(&AppSettings::default()).await?;
            println!("{}", "Application settings reset to defaults".green());
        }
        SettingsCommand::Reset { agents: true } => {
            backend
                .save_agent_settings(&AllAgentSettings::default())
                .await?;
            println!("{}", "Agent settings reset to defaults".green());
        }
    }

    Ok(())
}

/// Change one stored field
///
/// The stored document must load cleanly first; an unreadable file is
/// reported rather than replaced with defaults.
async fn set_setting<T: EditableSettings>(backend: &dyn Backend, key: &str, value: &str) -> Result<()> {
    let mut panel = SettingsPanel::<T>::new();
    panel.try_load(backend).await?;
    panel.set(key, value)?;

    if !panel.has_unsaved_changes() {
        println!("{}", format!("{} is already {}", key, value).yellow());
        return Ok(());
    }

    panel.save(backend).await?;
    println!("{}", format!("Set {} = {}", key, value).green());
    Ok(())
}

fn print_app_settings(settings: &AppSettings) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["Setting".bold(), "Value".bold()]);

    let rows: [(&str, String); 11] = [
        ("show_console_output", settings.show_console_output.to_string()),
        (
            "projects_folder",
            settings
                .projects_folder
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("file_mentions_enabled", settings.file_mentions_enabled.to_string()),
        ("ui_theme", settings.ui_theme.clone()),
        ("chat_send_shortcut", settings.chat_send_shortcut.clone()),
        (
            "show_welcome_recent_projects",
            settings.show_welcome_recent_projects.to_string(),
        ),
        ("max_chat_history", settings.max_chat_history.to_string()),
        ("default_cli_agent", settings.default_cli_agent.clone()),
        ("code_settings.theme", settings.code_settings.theme.clone()),
        (
            "code_settings.font_size",
            settings.code_settings.font_size.to_string(),
        ),
        (
            "code_settings.auto_collapse_sidebar",
            settings.code_settings.auto_collapse_sidebar.to_string(),
        ),
    ];

    for (key, value) in rows {
        table.add_row(prettytable::row![key.cyan(), value]);
    }

    println!("\nApplication settings:");
    table.printstd();
    println!();
}

fn print_agent_settings(agents: &AllAgentSettings) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Agent".bold(),
        "Enabled".bold(),
        "Model".bold(),
        "Sandbox".bold(),
        "Auto Approve".bold(),
        "Timeout (min)".bold(),
        "Output".bold(),
        "Max Tokens".bold(),
        "Temperature".bold()
    ]);

    let entries: [(&str, &AgentSettings); 3] = [
        ("claude", &agents.claude),
        ("codex", &agents.codex),
        ("gemini", &agents.gemini),
    ];
    for (name, agent) in entries {
        table.add_row(prettytable::row![
            name.cyan(),
            agent.enabled,
            agent.model.as_deref().unwrap_or("-"),
            agent.sandbox_mode,
            agent.auto_approval,
            agent.session_timeout_minutes,
            agent.output_format,
            agent
                .max_tokens
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
            agent
                .temperature
                .map_or_else(|| "-".to_string(), |t| t.to_string())
        ]);
    }

    println!("\nAgent settings:");
    table.printstd();
    println!(
        "{} {}",
        "Max concurrent sessions:".bold(),
        agents.max_concurrent_sessions
    );
    println!();
}
