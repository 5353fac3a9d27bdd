//! Product types for Lodestone.
//!
//! `Metadata` is the raw, schema-less record stored alongside each vector
//! in the index. `ProductView` is the sanitized projection handed to
//! callers at the output boundary: every optional field degrades to
//! `None`/empty rather than leaking null-token strings from noisy catalog
//! data.

use serde::{Deserialize, Serialize};

/// A raw catalog record: an unordered mapping of field name to JSON value.
///
/// No schema is enforced at storage time. Unknown columns from the source
/// CSV are preserved verbatim; validation and coercion happen only when a
/// record is rehydrated into a [`ProductView`].
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A single raw hit from the vector index: the record's position in the
/// store and its inner-product score against the query.
///
/// Position is the sole join key between the vector sequence and the
/// metadata sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub position: usize,
    pub score: f32,
}

/// Sanitized, typed projection of a catalog record.
///
/// `uniq_id` is always present: when the raw record lacks one, a stable
/// placeholder derived from the record's position is synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub uniq_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A product paired with its similarity score, as returned by the
/// retriever in descending score order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub product: ProductView,
    pub score: f32,
}
