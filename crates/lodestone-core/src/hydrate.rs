//! Metadata-to-product hydration at the output boundary.
//!
//! Raw records in the index carry whatever the catalog export contained.
//! Hydration projects them into the sanitized [`ProductView`] callers see:
//! string fields collapse null tokens, lists pass through only as proper
//! arrays, numbers parse leniently, and a missing identifier is replaced
//! by a stable position-derived placeholder.

use lodestone_types::product::{Metadata, ProductView};
use serde_json::Value;

use crate::coerce::{opt_f64, opt_string, string_list};

static NULL: Value = Value::Null;

fn field<'a>(record: &'a Metadata, name: &str) -> &'a Value {
    record.get(name).unwrap_or(&NULL)
}

/// Project a raw metadata record at `position` into a [`ProductView`].
///
/// Every result carries a stable identifier: when the record has no usable
/// `uniq_id`, one is synthesized from the record's position in the store.
pub fn product_view(record: &Metadata, position: usize) -> ProductView {
    ProductView {
        uniq_id: opt_string(field(record, "uniq_id"))
            .unwrap_or_else(|| format!("row_{position}")),
        title: opt_string(field(record, "title")).unwrap_or_default(),
        brand: opt_string(field(record, "brand")),
        description: opt_string(field(record, "description")),
        price: opt_f64(field(record, "price")),
        categories: string_list(field(record, "categories")),
        images: string_list(field(record, "images")),
        manufacturer: opt_string(field(record, "manufacturer")),
        package_dimensions: opt_string(field(record, "package_dimensions")),
        country_of_origin: opt_string(field(record, "country_of_origin")),
        material: opt_string(field(record, "material")),
        color: opt_string(field(record, "color")),
    }
}
