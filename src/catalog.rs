//! The menu: an immutable mapping from item id to catalog entry.

use crate::model::CatalogItem;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::HashMap;
use tracing::warn;

/// Read-only catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from a feed. Items keep feed order; when an id is
    /// repeated the first entry wins.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                warn!(item_id = %item.id, "Duplicate catalog id ignored");
                continue;
            }
            index.insert(item.id.clone(), kept.len());
            kept.push(item);
        }
        Self { items: kept, index }
    }

    pub fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// The menu as the assistant sees it: id, name, price and description.
    pub fn menu_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.items
                .iter()
                .map(|item| {
                    json!({
                        "id": item.id,
                        "name": item.name,
                        "price": item.unit_price.to_f64(),
                        "description": item.description,
                    })
                })
                .collect(),
        )
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(default_menu())
    }
}

/// The cafe's standard menu.
pub fn default_menu() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(
            "coffee-001",
            "Espresso",
            dec!(3.50),
            "A rich and aromatic shot of pure coffee.",
            "https://picsum.photos/id/225/200/200",
        ),
        CatalogItem::new(
            "coffee-002",
            "Cappuccino",
            dec!(4.50),
            "Espresso with steamed milk and a deep layer of foam.",
            "https://picsum.photos/id/30/200/200",
        ),
        CatalogItem::new(
            "pastry-001",
            "Croissant",
            dec!(3.00),
            "Buttery, flaky, and freshly baked.",
            "https://picsum.photos/id/368/200/200",
        ),
        CatalogItem::new(
            "sandwich-001",
            "Chicken Club",
            dec!(8.50),
            "Grilled chicken, bacon, lettuce, tomato on toasted bread.",
            "https://picsum.photos/id/1015/200/200",
        ),
        CatalogItem::new(
            "salad-001",
            "Caesar Salad",
            dec!(7.00),
            "Crisp romaine lettuce with Caesar dressing and croutons.",
            "https://picsum.photos/id/25/200/200",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_ids_only() {
        let catalog = Catalog::default();
        assert_eq!(catalog.lookup("pastry-001").unwrap().name, "Croissant");
        assert_eq!(catalog.lookup("coffee-001").unwrap().unit_price, dec!(3.50));
        assert!(catalog.lookup("bad").is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let mut items = default_menu();
        let mut shadow = items[0].clone();
        shadow.name = "Shadow".into();
        items.push(shadow);

        let catalog = Catalog::new(items);
        assert_eq!(catalog.items().len(), 5);
        assert_eq!(catalog.lookup("coffee-001").unwrap().name, "Espresso");
    }

    #[test]
    fn menu_json_omits_images() {
        let menu = Catalog::default().menu_json();
        assert_eq!(menu.as_array().unwrap().len(), 5);
        assert_eq!(menu[0]["id"], "coffee-001");
        assert_eq!(menu[0]["price"], 3.5);
        assert!(menu[0].get("imageRef").is_none());
    }
}
