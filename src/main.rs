//! Commander - AI coding session manager
//!
#![doc = "Main entry point for the Commander CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commander::cli::{Cli, Commands};
use commander::commands;
use commander::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&config, command).await?;
        }
        Commands::Settings { command } => {
            tracing::info!("Starting settings command");
            commands::settings::handle_settings(&config, command).await?;
        }
        Commands::Projects { command } => {
            tracing::info!("Starting projects command");
            commands::projects::handle_projects(&config, command).await?;
        }
        Commands::Prompts { command } => {
            tracing::info!("Starting prompts command");
            commands::prompts::handle_prompts(&config, command).await?;
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins; otherwise `-v` raises the crate level to debug.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "commander=debug" } else { "commander=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
