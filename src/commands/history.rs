use crate::backend::{AppendChatRequest, Backend};
use crate::chat::export::format_timestamp;
use crate::chat::{
    export_sessions, extract_file_mentions, retention_cutoff, search_sessions, ChatMessage,
    ChatSession, ExportFormat, HistoryStats, SearchQuery, Segmenter,
};
use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::{CommanderError, Result};
use crate::views::ChatHistoryView;
use chrono::Utc;
use colored::Colorize;
use prettytable::{format, Table};
use std::collections::BTreeSet;

/// Handle history commands
pub async fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let backend = config.backend()?;
    let segmenter = Segmenter::new(config.segmentation_options());

    match command {
        HistoryCommand::List { project: None } => {
            let projects = backend.storage().list_history_projects()?;

            if projects.is_empty() {
                println!("{}", "No chat history found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "Project".bold(),
                "Messages".bold(),
                "Last Activity".bold()
            ]);
            for project in projects {
                table.add_row(prettytable::row![
                    project.path.cyan(),
                    project.message_count,
                    format_timestamp(project.last_timestamp)
                ]);
            }

            println!("\nProjects with chat history:");
            table.printstd();
            println!();
            println!(
                "Use {} to list sessions.",
                "commander history list --project <PATH>".cyan()
            );
            println!();
        }
        HistoryCommand::List {
            project: Some(project),
        } => {
            let view = load_view(&backend, segmenter, &project).await?;

            if view.sessions().is_empty() {
                println!("{}", format!("No chat history for {}.", project).yellow());
                return Ok(());
            }

            let numbered: Vec<(usize, &ChatSession)> =
                view.sessions().iter().enumerate().map(|(i, s)| (i + 1, s)).collect();
            println!("\nSessions for {}:", project);
            print_sessions(&numbered);
            println!();
            println!(
                "Use {} to read a session.",
                "commander history show --project <PATH> <#>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { project, session } => {
            let mut view = load_view(&backend, segmenter, &project).await?;
            select_numbered(&mut view, &project, session)?;
            let Some(session) = view.selected() else {
                return Err(no_session(&project, session));
            };

            println!(
                "\n{} {}",
                "Session:".bold(),
                session.summary.as_str().cyan()
            );
            println!(
                "{} {}  {} {}  {} {}",
                "Started:".bold(),
                format_timestamp(session.start),
                "Agent:".bold(),
                session.agent.as_deref().unwrap_or("-"),
                "Messages:".bold(),
                session.message_count()
            );
            println!();

            let mut mentions = BTreeSet::new();
            for message in &session.messages {
                let heading = if message.is_user() {
                    "User".green().bold()
                } else {
                    message.role.as_str().blue().bold()
                };
                println!("{} [{}]", heading, format_timestamp(message.timestamp));
                println!("{}\n", message.content);
                mentions.extend(extract_file_mentions(&message.content));
            }

            if !mentions.is_empty() {
                println!("{}", "Files mentioned:".bold());
                for file in mentions {
                    println!("  {}", file.cyan());
                }
                println!();
            }
        }
        HistoryCommand::Add {
            project,
            role,
            agent,
            timestamp,
            content,
        } => {
            let timestamp = timestamp.unwrap_or_else(|| Utc::now().timestamp_millis());
            let mut message = ChatMessage::new(role, content, timestamp);
            message.agent = agent;

            let id = backend
                .append_chat_message(&AppendChatRequest {
                    project_path: project.clone(),
                    message,
                })
                .await?;
            println!("{}", format!("Added message {} to {}", id, project).green());
        }
        HistoryCommand::Delete { project, session } => {
            let mut view = load_view(&backend, segmenter, &project).await?;
            select_numbered(&mut view, &project, session)?;
            let deleted = view.delete_selected(&backend, &project).await?;
            println!(
                "{}",
                format!("Deleted session #{} ({} messages)", session, deleted).green()
            );
        }
        HistoryCommand::Search {
            project,
            query,
            agent,
            limit,
        } => {
            let view = load_view(&backend, segmenter, &project).await?;
            let query = SearchQuery {
                agent,
                limit,
                ..SearchQuery::new(query)
            };
            let hits = search_sessions(view.sessions(), &query);
            tracing::debug!(project = %project, hits = hits.len(), "Searched chat history");

            if hits.is_empty() {
                println!(
                    "{}",
                    format!("No sessions in {} match '{}'.", project, query.text).yellow()
                );
                return Ok(());
            }

            let numbered: Vec<(usize, &ChatSession)> = view
                .sessions()
                .iter()
                .enumerate()
                .filter(|(_, s)| hits.iter().any(|hit| std::ptr::eq(*hit, *s)))
                .map(|(i, s)| (i + 1, s))
                .collect();
            println!("\nSessions in {} matching '{}':", project, query.text);
            print_sessions(&numbered);
            println!();
        }
        HistoryCommand::Cleanup { project, days } => {
            let mut view = load_view(&backend, segmenter, &project).await?;
            let cutoff = retention_cutoff(Utc::now().timestamp_millis(), days);
            let deleted = view.delete_expired(&backend, &project, cutoff).await?;

            if deleted == 0 {
                println!(
                    "{}",
                    format!("No sessions older than {} days in {}.", days, project).yellow()
                );
            } else {
                println!(
                    "{}",
                    format!(
                        "Deleted {} sessions older than {} days from {}",
                        deleted, days, project
                    )
                    .green()
                );
            }
        }
        HistoryCommand::Clear { project } => {
            let deleted = backend.storage().clear_project(&project)?;
            println!(
                "{}",
                format!("Cleared {} messages from {}", deleted, project).green()
            );
        }
        HistoryCommand::Stats { project } => {
            let view = load_view(&backend, segmenter, &project).await?;
            let stats = HistoryStats::from_sessions(view.sessions());

            println!("\n{} {}", "Project:".bold(), project.cyan());
            println!("{} {}", "Sessions:".bold(), stats.total_sessions);
            println!("{} {}", "Messages:".bold(), stats.total_messages);
            if let Some((first, last)) = stats.date_range {
                println!(
                    "{} {} .. {}",
                    "Range:".bold(),
                    format_timestamp(first),
                    format_timestamp(last)
                );
            }

            if !stats.agents_used.is_empty() {
                let mut table = Table::new();
                table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
                table.add_row(prettytable::row!["Agent".bold(), "Sessions".bold()]);
                for (agent, count) in &stats.agents_used {
                    table.add_row(prettytable::row![agent, count]);
                }
                table.printstd();
            }
            println!();
        }
        HistoryCommand::Export {
            project,
            format: format_name,
            metadata,
            output,
        } => {
            let export_format: ExportFormat = format_name.parse()?;
            let view = load_view(&backend, segmenter, &project).await?;
            let rendered = export_sessions(&project, view.sessions(), export_format, metadata)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    println!(
                        "{}",
                        format!(
                            "Exported {} sessions as {} to {}",
                            view.sessions().len(),
                            export_format,
                            path.display()
                        )
                        .green()
                    );
                }
                None => println!("{}", rendered),
            }
        }
        HistoryCommand::Import { project, file } => {
            let imported = backend.storage().import_legacy(&project, &file)?;
            println!(
                "{}",
                format!("Imported {} messages into {}", imported, project).green()
            );
        }
    }

    Ok(())
}

/// Read and segment a project's history, failing if storage cannot be read
async fn load_view(
    backend: &dyn Backend,
    segmenter: Segmenter,
    project: &str,
) -> Result<ChatHistoryView> {
    let mut view = ChatHistoryView::new(segmenter);
    view.try_refresh(backend, project).await?;
    Ok(view)
}

/// Select by the 1-based number shown in `history list`
fn select_numbered(view: &mut ChatHistoryView, project: &str, number: usize) -> Result<()> {
    match number.checked_sub(1) {
        Some(index) if view.select_index(index) => Ok(()),
        _ => Err(no_session(project, number)),
    }
}

fn print_sessions(sessions: &[(usize, &ChatSession)]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "#".bold(),
        "Started".bold(),
        "Agent".bold(),
        "Messages".bold(),
        "Summary".bold()
    ]);
    for (number, session) in sessions {
        table.add_row(prettytable::row![
            number.to_string().cyan(),
            format_timestamp(session.start),
            session.agent.as_deref().unwrap_or("-"),
            session.message_count(),
            session.summary
        ]);
    }
    table.printstd();
}

fn no_session(project: &str, number: usize) -> anyhow::Error {
    CommanderError::InvalidInput(format!("no session #{} in {}", number, project)).into()
}
