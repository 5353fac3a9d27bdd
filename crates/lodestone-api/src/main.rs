//! Lodestone CLI entry point.
//!
//! Binary name: `lode`
//!
//! Parses CLI arguments, initializes tracing, then dispatches to the
//! catalog build/inspect or search command handlers.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,lodestone_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ingest { csv, out } => {
            cli::catalog::ingest_catalog(&csv, out, cli.json, cli.quiet).await?;
        }

        Commands::Search { query, k, index } => {
            cli::search::run_search(&query, k, index, cli.json).await?;
        }

        Commands::Info { index } => {
            cli::catalog::info(index, cli.json).await?;
        }
    }

    Ok(())
}
