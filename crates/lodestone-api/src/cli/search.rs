//! Catalog search command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use console::style;

use lodestone_infra::config::load_config;
use lodestone_infra::embedder::FastembedEncoder;
use lodestone_infra::retriever::ProductRetriever;
use lodestone_types::error::RetrieveError;

/// Embed the query, search the index, and render the ranked results.
pub async fn run_search(
    query: &str,
    k: Option<usize>,
    index: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(Path::new(".")).await;
    let base = index.unwrap_or_else(|| config.index_base());
    let k = k.unwrap_or(config.default_k);

    let encoder = FastembedEncoder::new().context("failed to initialize embedding model")?;
    let retriever = ProductRetriever::new(encoder, base);

    let results = match retriever.search(query, k).await {
        Ok(results) => results,
        Err(RetrieveError::IndexNotBuilt) => {
            anyhow::bail!("index not built; run `lode ingest <csv>` first")
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} no results", style("--").yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["score", "id", "title", "brand", "price"]);

    for item in &results {
        table.add_row(vec![
            Cell::new(format!("{:.3}", item.score)),
            Cell::new(&item.product.uniq_id),
            Cell::new(&item.product.title),
            Cell::new(item.product.brand.clone().unwrap_or_default()),
            Cell::new(
                item.product
                    .price
                    .map(|p| format!("{p:.2}"))
                    .unwrap_or_default(),
            ),
        ]);
    }

    println!("{table}");
    Ok(())
}
