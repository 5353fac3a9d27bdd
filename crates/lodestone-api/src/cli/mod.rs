//! CLI command definitions and dispatch for the `lode` binary.
//!
//! Uses clap derive macros for argument parsing. Index locations default
//! to the configured data directory; `--out`/`--index` override per call.

pub mod catalog;
pub mod search;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

/// Semantic product search over a catalog index.
#[derive(Parser)]
#[command(name = "lode", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the catalog index from a CSV export.
    Ingest {
        /// Path to the catalog CSV.
        csv: PathBuf,

        /// Base path for the index artifacts.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Search the catalog for products similar to a free-text query.
    Search {
        /// Free-text query.
        query: String,

        /// Number of results to return.
        #[arg(short, long)]
        k: Option<usize>,

        /// Base path of the index artifacts.
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// Show the persisted index status.
    Info {
        /// Base path of the index artifacts.
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

/// Resolve the index base path: explicit flag first, configured default
/// otherwise.
pub(crate) async fn resolve_base(explicit: Option<PathBuf>) -> PathBuf {
    match explicit {
        Some(base) => base,
        None => lodestone_infra::config::load_config(Path::new("."))
            .await
            .index_base(),
    }
}
