//! Lese CLI entry point.

use anyhow::Result;
use clap::Parser;
use lese::cli::{commands, Cli, Commands};
use lese::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lese={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Chat { model } => {
            commands::run_chat(model.clone(), settings).await?;
        }

        Commands::Concerts { model } => {
            commands::run_concerts(model.clone(), settings).await?;
        }

        Commands::Assistant { model } => {
            commands::run_assistant(model.clone(), settings).await?;
        }

        Commands::Digest { date, model } => {
            commands::run_digest(date.clone(), model.clone(), settings).await?;
        }

        Commands::Ask {
            question,
            date,
            max_papers,
            model,
        } => {
            commands::run_ask(question, date.clone(), *max_papers, model.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
