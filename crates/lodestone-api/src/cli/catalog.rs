//! Catalog index commands: build from CSV and inspect.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::ProgressBar;

use lodestone_infra::embedder::{FastembedEncoder, EMBEDDING_DIMENSION, MODEL_NAME};
use lodestone_infra::flat::{artifacts_exist, index_path, meta_path, FlatIndex};
use lodestone_infra::ingest;

use super::resolve_base;

/// Run the ingest pipeline against a catalog CSV.
pub async fn ingest_catalog(
    csv: &Path,
    out: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let base = resolve_base(out).await;

    let spinner = (!json && !quiet).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(format!("loading embedding model {MODEL_NAME}"));
        pb
    });

    let encoder = FastembedEncoder::new().context("failed to initialize embedding model")?;

    if let Some(pb) = &spinner {
        pb.set_message(format!("embedding catalog rows from {}", csv.display()));
    }

    let report = ingest::build_index(csv, &base, &encoder).await?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "rows": report.rows,
                "dimension": report.dimension,
                "index": index_path(&base),
                "metadata": meta_path(&base),
            })
        );
    } else if !quiet {
        println!(
            "{} indexed {} rows at dimension {}",
            style("ok").green().bold(),
            report.rows,
            report.dimension
        );
        println!("   {}", index_path(&base).display());
        println!("   {}", meta_path(&base).display());
    }

    Ok(())
}

/// Print the persisted index status.
pub async fn info(index: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let base = resolve_base(index).await;

    if !artifacts_exist(&base) {
        if json {
            println!("{}", serde_json::json!({ "built": false }));
        } else {
            println!(
                "{} index not built; run `lode ingest <csv>` first",
                style("--").yellow()
            );
        }
        return Ok(());
    }

    let loaded = FlatIndex::load(&base, EMBEDDING_DIMENSION)
        .with_context(|| format!("failed to load index at {}", base.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "built": true,
                "rows": loaded.len(),
                "dimension": loaded.dimension(),
                "model": MODEL_NAME,
                "index": index_path(&base),
                "metadata": meta_path(&base),
            })
        );
    } else {
        println!("rows:      {}", loaded.len());
        println!("dimension: {}", loaded.dimension());
        println!("model:     {MODEL_NAME}");
        println!("index:     {}", index_path(&base).display());
        println!("metadata:  {}", meta_path(&base).display());
    }

    Ok(())
}
