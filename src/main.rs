use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use rubyseek::cli::{Cli, Commands};
use rubyseek::config::Config;
use rubyseek::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Determine project root (current directory)
    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Load configuration (if available, otherwise use defaults)
    let config = Config::load(&project_root).unwrap_or_default();

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &project_root)?;

    tracing::info!("rubyseek starting up");
    tracing::debug!("Project root: {}", project_root.display());

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            rubyseek::commands::init::run().await?;
        }
        Commands::Index { detail } => {
            rubyseek::commands::index::run(detail).await?;
        }
        Commands::Search {
            query,
            limit,
            detail,
        } => {
            rubyseek::commands::search::run(&query, limit, detail).await?;
        }
        Commands::Outline { file, json } => {
            rubyseek::commands::outline::run(&file, json).await?;
        }
        Commands::Watch { debounce_ms } => {
            rubyseek::commands::watch::run(debounce_ms).await?;
        }
    }

    Ok(())
}
