//! Product catalog keyed by canonical UPC.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::fields::text_field;
use crate::upc::{normalize_upc, Upc};

const UNKNOWN_PRODUCT_NAME: &str = "Unknown product";

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub upc: Upc,
    pub name: String,
    pub image_url: Option<String>,
    /// Optional external product page.
    pub url: Option<String>,
}

impl Product {
    /// Build a product from one catalog record (`{UPC, Name, Image, URL}`).
    ///
    /// Returns `None` when the record is not an object or has no usable UPC.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let upc = ["UPC", "upc"]
            .iter()
            .find_map(|key| record.get(*key).and_then(normalize_upc))?;

        Some(Self {
            upc,
            name: text_field(record, &["Name", "name"])
                .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
            image_url: text_field(record, &["Image", "image", "image_url"]),
            url: text_field(record, &["URL", "url"]),
        })
    }
}

/// Immutable UPC → product lookup.
///
/// Built once per load and swapped in wholesale; never edited in place.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<Upc, Product>,
}

impl Catalog {
    /// Build a catalog from the raw catalog document.
    ///
    /// Anything other than a top-level array yields an empty catalog. When two
    /// records share a UPC the later one wins.
    #[must_use]
    pub fn from_value(document: &Value) -> Self {
        let Some(records) = document.as_array() else {
            tracing::warn!("catalog document is not an array; using empty catalog");
            return Self::default();
        };

        let catalog = Self::from_products(records.iter().filter_map(Product::from_value));
        let skipped = records.len().saturating_sub(catalog.len());
        if skipped > 0 {
            tracing::debug!(
                records = records.len(),
                products = catalog.len(),
                skipped,
                "catalog records skipped or collapsed by UPC"
            );
        }
        catalog
    }

    #[must_use]
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|p| (p.upc.clone(), p))
            .collect::<HashMap<_, _>>();
        Self { products }
    }

    #[must_use]
    pub fn get(&self, upc: &Upc) -> Option<&Product> {
        self.products.get(upc)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
