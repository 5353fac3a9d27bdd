//! Catalog ingest pipeline: CSV rows to a persisted flat index.
//!
//! Reads a tabular catalog export, normalizes the list-valued and
//! currency-valued fields, builds the composite embedding text per row,
//! batch-encodes every row, and persists the populated index.
//!
//! Field-level noise degrades to absent/empty and ingestion continues; a
//! missing or unreadable source aborts the whole pipeline.

use std::path::Path;

use lodestone_core::coerce::is_null_token;
use lodestone_core::embedder::Embedder;
use lodestone_core::text::product_text;
use lodestone_types::error::IngestError;
use lodestone_types::product::Metadata;

use crate::flat::FlatIndex;

/// Columns whose cells hold an encoded list of strings.
const LIST_FIELDS: [&str; 2] = ["categories", "images"];

/// Summary of one completed ingest pass.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub rows: usize,
    pub dimension: usize,
}

/// Parse a list-encoded cell.
///
/// Tries a literal sequence first: a JSON array, or a Python-style
/// bracketed list with single quotes. Falls back to splitting on commas
/// with whitespace trimmed and empty pieces discarded. A missing or
/// null-token cell yields an empty list.
pub fn parse_list(cell: &str) -> Vec<String> {
    let s = cell.trim();
    if s.is_empty() || is_null_token(s) {
        return Vec::new();
    }

    if let Ok(items) = serde_json::from_str::<Vec<String>>(s) {
        return items
            .iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
    }

    let inner = if s.starts_with('[') && s.ends_with(']') {
        &s[1..s.len() - 1]
    } else {
        s
    };

    inner
        .split(',')
        .map(|piece| piece.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a price cell leniently.
///
/// Strips currency symbols and thousands separators before parsing. A
/// dash-joined range averages its bounds ("₹1,299–₹1,499" -> 1399.0).
/// Unparsable or missing values yield `None` -- never zero, never an
/// error.
pub fn parse_price(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() || is_null_token(s) {
        return None;
    }

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '–' | '—'))
        .collect();

    let bounds: Vec<f64> = cleaned
        .split(['-', '–', '—'])
        .filter(|piece| !piece.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    match bounds.as_slice() {
        [] => None,
        [value] => Some(*value),
        values => Some(values.iter().sum::<f64>() / values.len() as f64),
    }
}

/// Normalize one raw row in place: list fields become JSON arrays, the
/// price field becomes a number or an explicit null.
pub fn normalize_row(row: &mut Metadata) {
    for field in LIST_FIELDS {
        let parsed = match row.get(field) {
            Some(serde_json::Value::String(cell)) => Some(parse_list(cell)),
            _ => None,
        };
        if let Some(parsed) = parsed {
            row.insert(field.to_string(), serde_json::json!(parsed));
        }
    }

    let price = match row.get("price") {
        Some(serde_json::Value::String(cell)) => Some(parse_price(cell)),
        _ => None,
    };
    if let Some(price) = price {
        row.insert("price".to_string(), serde_json::json!(price));
    }
}

/// Load and normalize every row of a catalog CSV.
///
/// Every cell is preserved as a string under its column header (unknown
/// columns stay opaque), then the known list/price fields are normalized.
/// A row the CSV reader cannot decode is skipped with a warning; an
/// unreadable source aborts with [`IngestError::Source`].
pub fn load_rows(path: &Path) -> Result<Vec<Metadata>, IngestError> {
    let source_err = |reason: String| IngestError::Source {
        path: path.display().to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| source_err(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| source_err(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping undecodable catalog row");
                continue;
            }
        };

        let mut row = Metadata::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), serde_json::json!(cell));
        }
        normalize_row(&mut row);
        rows.push(row);
    }

    tracing::info!(rows = rows.len(), path = %path.display(), "loaded catalog rows");
    Ok(rows)
}

/// Run the full ingest pass: load, normalize, embed, populate, persist.
pub async fn build_index<E: Embedder>(
    csv_path: &Path,
    out_base: &Path,
    embedder: &E,
) -> Result<IngestReport, IngestError> {
    let rows = load_rows(csv_path)?;
    let texts: Vec<String> = rows.iter().map(product_text).collect();

    let vectors = embedder.embed(&texts).await?;

    let mut index = FlatIndex::new(embedder.dimension());
    index.add(vectors, rows)?;
    index.save(out_base)?;

    tracing::info!(
        rows = index.len(),
        dimension = index.dimension(),
        base = %out_base.display(),
        "built catalog index"
    );
    Ok(IngestReport {
        rows: index.len(),
        dimension: index.dimension(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestone_types::error::EmbedError;
    use serde_json::json;
    use std::io::Write;

    /// Deterministic stand-in encoder: hashes each text into a seed and
    /// emits a unit-normalized vector, so identical texts embed equally.
    struct StubEncoder {
        dimension: usize,
    }

    impl Embedder for StubEncoder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts
                .iter()
                .map(|text| {
                    let seed = text.bytes().map(u32::from).sum::<u32>() as f32;
                    let mut vec: Vec<f32> = (0..self.dimension)
                        .map(|i| ((i as f32 + seed) * 0.37).sin())
                        .collect();
                    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
                    for v in vec.iter_mut() {
                        *v /= norm;
                    }
                    vec
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "stub"
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    fn write_csv(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("catalog.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_list_literal_sequence() {
        assert_eq!(parse_list("['a', 'b']"), vec!["a", "b"]);
        assert_eq!(parse_list(r#"["Furniture", "Office"]"#), vec!["Furniture", "Office"]);
    }

    #[test]
    fn test_parse_list_comma_fallback() {
        assert_eq!(parse_list("a, b"), vec!["a", "b"]);
        assert_eq!(parse_list("a,,b , "), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_list_empty_and_null_tokens() {
        assert!(parse_list("").is_empty());
        assert!(parse_list("   ").is_empty());
        assert!(parse_list("nan").is_empty());
        assert!(parse_list("[]").is_empty());
    }

    #[test]
    fn test_parse_price_plain_and_symbols() {
        assert_eq!(parse_price("59.99"), Some(59.99));
        assert_eq!(parse_price("$59.99"), Some(59.99));
        assert_eq!(parse_price("$1,299.00"), Some(1299.0));
    }

    #[test]
    fn test_parse_price_range_averages_bounds() {
        assert_eq!(parse_price("₹1,299–₹1,499"), Some(1399.0));
        assert_eq!(parse_price("$10 - $20"), Some(15.0));
    }

    #[test]
    fn test_parse_price_unparsable_is_absent() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("nan"), None);
        assert_eq!(parse_price("call for price"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn test_normalize_row_rewrites_known_fields() {
        let mut row = Metadata::new();
        row.insert("categories".to_string(), json!("['Home', 'Decor']"));
        row.insert("images".to_string(), json!(""));
        row.insert("price".to_string(), json!("$1,299–$1,499"));
        row.insert("sku".to_string(), json!("L-204"));

        normalize_row(&mut row);

        assert_eq!(row["categories"], json!(["Home", "Decor"]));
        assert_eq!(row["images"], json!([]));
        assert_eq!(row["price"], json!(1399.0));
        // Unknown columns stay opaque.
        assert_eq!(row["sku"], json!("L-204"));
    }

    #[test]
    fn test_normalize_row_bad_price_is_null() {
        let mut row = Metadata::new();
        row.insert("price".to_string(), json!("contact us"));
        normalize_row(&mut row);
        assert_eq!(row["price"], serde_json::Value::Null);
    }

    #[test]
    fn test_load_rows_preserves_unknown_columns() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_csv(
            temp_dir.path(),
            "title,brand,categories,price,warranty\n\
             Oak shelf,Sauder,\"['Furniture', 'Storage']\",$129.99,2 years\n\
             Desk lamp,,\"a, b\",nan,\n",
        );

        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], json!("Oak shelf"));
        assert_eq!(rows[0]["categories"], json!(["Furniture", "Storage"]));
        assert_eq!(rows[0]["price"], json!(129.99));
        assert_eq!(rows[0]["warranty"], json!("2 years"));
        assert_eq!(rows[1]["categories"], json!(["a", "b"]));
        assert_eq!(rows[1]["price"], serde_json::Value::Null);
    }

    #[test]
    fn test_load_rows_missing_source_aborts() {
        let result = load_rows(Path::new("/nonexistent/catalog.csv"));
        assert!(matches!(result, Err(IngestError::Source { .. })));
    }

    #[tokio::test]
    async fn test_build_index_persists_aligned_artifacts() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = write_csv(
            temp_dir.path(),
            "uniq_id,title,brand,categories,price\n\
             A1,Oak shelf,Sauder,\"['Furniture']\",$129.99\n\
             A2,Desk lamp,Luxo,\"['Lighting']\",$39.50\n\
             A3,Ceramic mug,,,\n",
        );
        let base = temp_dir.path().join("catalog");
        let encoder = StubEncoder { dimension: 16 };

        let report = build_index(&path, &base, &encoder).await.unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.dimension, 16);

        let index = FlatIndex::load(&base, 16).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.metadata(0).unwrap()["uniq_id"], json!("A1"));
        assert_eq!(index.metadata(2).unwrap()["title"], json!("Ceramic mug"));
    }
}
