use crate::backend::{Backend, OpenProjectRequest};
use crate::chat::export::format_timestamp;
use crate::cli::ProjectsCommand;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle recent projects commands
pub async fn handle_projects(config: &Config, command: ProjectsCommand) -> Result<()> {
    let backend = config.backend()?;

    match command {
        ProjectsCommand::List => {
            let projects = backend.list_recent_projects().await?;

            if projects.is_empty() {
                println!("{}", "No recent projects.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
            table.add_row(prettytable::row![
                "Name".bold(),
                "Path".bold(),
                "Last Opened".bold()
            ]);
            for project in projects {
                table.add_row(prettytable::row![
                    project.name.cyan(),
                    project.path,
                    format_timestamp(project.last_accessed)
                ]);
            }

            println!("\nRecent projects:");
            table.printstd();
            println!();
        }
        ProjectsCommand::Open { path } => {
            let project = backend.open_project(&OpenProjectRequest { path }).await?;
            println!(
                "{}",
                format!("Opened {} ({})", project.name, project.path).green()
            );
        }
    }

    Ok(())
}
