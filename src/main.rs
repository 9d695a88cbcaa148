mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use flashdeck::config::FlashdeckConfig;
use flashdeck::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flashdeck", version, about = "Study flashcards generated from your notes")]
struct Cli {
    /// Config file (defaults to ~/.flashdeck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Show review progress
    Stats,
    /// List cards that are due for review, most overdue first
    Due {
        /// Show at most this many cards
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one card in full
    Inspect { id: i64 },
    /// Grade a card: `correct` or `incorrect`
    Review { id: i64, outcome: String },
    /// Dump every card as JSON to stdout
    Export,
    /// Check the database and print a health report
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FlashdeckConfig::load_from(path)?,
        None => FlashdeckConfig::load()?,
    };

    // Log to stderr so stdout stays clean for `export`.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Due { limit } => cli::due::due(&config, limit)?,
        Command::Inspect { id } => cli::inspect::inspect(&config, id)?,
        Command::Review { id, outcome } => cli::review::review(&config, id, &outcome)?,
        Command::Export => cli::export::export(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
