use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable menu entry.
///
/// Older snapshots use `price` and `image`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float", alias = "price")]
    pub unit_price: Decimal,
    pub description: String,
    #[serde(alias = "image")]
    pub image_ref: String,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        description: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            description: description.into(),
            image_ref: image_ref.into(),
        }
    }
}
