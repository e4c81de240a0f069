//! Resolving a store's UPCs against the catalog.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::store::Store;
use crate::upc::Upc;

/// One line of a store's "available items" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedProduct {
    Known {
        upc: Upc,
        name: String,
        image_url: Option<String>,
        url: Option<String>,
    },
    /// The store lists a UPC the catalog does not know. Shown, not dropped.
    Unknown { upc: Upc },
}

impl ResolvedProduct {
    #[must_use]
    pub fn upc(&self) -> &Upc {
        match self {
            Self::Known { upc, .. } | Self::Unknown { upc } => upc,
        }
    }

    /// Text shown for this entry.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Known { name, .. } => name.clone(),
            Self::Unknown { upc } => format!("Unknown UPC: {upc}"),
        }
    }
}

/// Look up every UPC a store lists, in the store's order.
#[must_use]
pub fn resolve_products(store: &Store, catalog: &Catalog) -> Vec<ResolvedProduct> {
    store
        .available_upcs
        .iter()
        .map(|upc| match catalog.get(upc) {
            Some(product) => ResolvedProduct::Known {
                upc: upc.clone(),
                name: product.name.clone(),
                image_url: product.image_url.clone(),
                url: product.url.clone(),
            },
            None => ResolvedProduct::Unknown { upc: upc.clone() },
        })
        .collect()
}
