//! Product data module
//!
//! The catalog is a small hardcoded product list, built once at startup and
//! shared read-only across all requests. There is no write path.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A single storefront product
///
/// `properties` is an ad-hoc attribute map (color, size, category, ...);
/// its shape is intentionally not schema-enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub properties: Map<String, Value>,
    pub image: String,
}

/// The immutable product catalog
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build the builtin demo catalog
    pub fn builtin() -> Self {
        Self {
            products: vec![
                Product {
                    id: 1,
                    name: "Product 1".to_string(),
                    description: "This is product 1".to_string(),
                    price: 10.0,
                    properties: attributes(&[
                        ("color", "red"),
                        ("size", "M"),
                        ("category", "clothing"),
                    ]),
                    image: "https://via.placeholder.com/150".to_string(),
                },
                Product {
                    id: 2,
                    name: "Product 2".to_string(),
                    description: "This is product 2".to_string(),
                    price: 60.0,
                    properties: attributes(&[
                        ("color", "blue"),
                        ("size", "L"),
                        ("category", "clothing"),
                    ]),
                    image: "https://via.placeholder.com/150".to_string(),
                },
                Product {
                    id: 3,
                    name: "Product 3".to_string(),
                    description: "This is product 3".to_string(),
                    price: 25.0,
                    properties: attributes(&[
                        ("color", "green"),
                        ("material", "leather"),
                        ("category", "accessories"),
                    ]),
                    image: "https://via.placeholder.com/150".to_string(),
                },
            ],
        }
    }

    /// Find the first product whose id equals the given key
    pub fn find(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// All products, in definition order
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Build an attribute map from string pairs
fn attributes(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), json!(value)))
        .collect()
}
