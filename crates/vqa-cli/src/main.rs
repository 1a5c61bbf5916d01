use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vqa_infrastructure::{ConfigService, VqaPaths};

mod commands;

#[derive(Parser)]
#[command(name = "vqa")]
#[command(about = "VQA CLI - streaming chat transcript tools", long_about = None)]
struct Cli {
    /// Use this directory instead of the platform config directory
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded push-channel event log and print the transcript
    Replay {
        /// JSON Lines file of events and prompts
        file: PathBuf,
        /// Start with this session id already assigned
        #[arg(long)]
        session: Option<String>,
        /// Group id attached to replayed prompts
        #[arg(long)]
        group: Option<String>,
        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show configuration and state file locations
    Paths,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = VqaPaths::new(cli.config_dir.as_deref()).context("Failed to resolve config directory")?;
    let config = ConfigService::new(&paths).get_config();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Replay {
            file,
            session,
            group,
            json,
        } => {
            let options = commands::replay::ReplayOptions {
                session,
                group,
                json,
            };
            commands::replay::run(config, &file, options).await?
        }
        Commands::Paths => commands::paths::show(&paths),
    }

    Ok(())
}
