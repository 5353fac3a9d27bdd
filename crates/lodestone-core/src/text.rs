//! Composite embedding text for catalog records.
//!
//! Builds the single string the embedder sees for each product. Field
//! order is fixed so the same record always embeds to the same vector.

use lodestone_types::product::Metadata;

use crate::coerce::{opt_string, string_list};

/// Fields that contribute to the embedding text, in order.
const TEXT_FIELDS: [&str; 6] = [
    "title",
    "description",
    "categories",
    "brand",
    "material",
    "color",
];

/// Build the composite text for one catalog record.
///
/// Concatenates title, description, categories (joined by spaces), brand,
/// material, and color -- only the fields that are present and non-empty
/// after normalization. Non-empty parts are joined with `" | "`; absent
/// fields are skipped entirely, so the separator never doubles.
pub fn product_text(record: &Metadata) -> String {
    let parts: Vec<String> = TEXT_FIELDS
        .iter()
        .filter_map(|field| {
            let value = record.get(*field)?;
            if *field == "categories" {
                let joined = string_list(value).join(" ");
                (!joined.is_empty()).then_some(joined)
            } else {
                opt_string(value)
            }
        })
        .collect();

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(pairs: &[(&str, Value)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_full_record_joins_in_fixed_order() {
        let rec = record(&[
            ("title", json!("Walnut desk")),
            ("description", json!("Mid-century writing desk")),
            ("categories", json!(["Furniture", "Office"])),
            ("brand", json!("Herman Miller")),
            ("material", json!("walnut")),
            ("color", json!("brown")),
        ]);
        assert_eq!(
            product_text(&rec),
            "Walnut desk | Mid-century writing desk | Furniture Office | Herman Miller | walnut | brown"
        );
    }

    #[test]
    fn test_absent_fields_are_skipped_without_doubling() {
        let rec = record(&[
            ("title", json!("Walnut desk")),
            ("description", json!("nan")),
            ("categories", json!([])),
            ("brand", json!("Herman Miller")),
        ]);
        assert_eq!(product_text(&rec), "Walnut desk | Herman Miller");
    }

    #[test]
    fn test_null_tokens_collapse_inside_categories() {
        let rec = record(&[
            ("title", json!("Lamp")),
            ("categories", json!(["none", "Lighting", ""])),
        ]);
        assert_eq!(product_text(&rec), "Lamp | Lighting");
    }

    #[test]
    fn test_empty_record_yields_empty_text() {
        assert_eq!(product_text(&Metadata::new()), "");
    }

    #[test]
    fn test_non_array_categories_are_ignored() {
        let rec = record(&[
            ("title", json!("Lamp")),
            ("categories", json!("Lighting, Decor")),
        ]);
        // Categories that were never normalized into a list contribute nothing.
        assert_eq!(product_text(&rec), "Lamp");
    }

    #[test]
    fn test_unknown_fields_do_not_contribute() {
        let rec = record(&[
            ("title", json!("Lamp")),
            ("sku", json!("L-204")),
            ("price", json!(39.5)),
        ]);
        assert_eq!(product_text(&rec), "Lamp");
    }
}
