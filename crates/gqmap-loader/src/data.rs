//! Loading a variant's catalog and store list.
//!
//! Failures never propagate out of [`load_variant`]: a collection that
//! cannot be fetched is logged and replaced with an empty one, and the
//! locator carries on in a degraded "no data" state. There are no retries.

use gqmap_core::VariantConfig;
use gqmap_engine::{Catalog, LocatorSession, StoreList};

use crate::client::{cache_buster_token, with_cache_buster, DataClient};
use crate::error::LoaderError;

/// Both collections from one load, ready to be swapped into a session.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub catalog: Catalog,
    pub stores: StoreList,
}

impl LoadedData {
    /// Replace the session's collections wholesale.
    pub fn apply_to(self, session: &mut LocatorSession) {
        session.replace_catalog(self.catalog);
        session.replace_stores(self.stores);
    }
}

/// Fetch and normalise the product catalog.
///
/// # Errors
///
/// Propagates [`DataClient::fetch_json`] failures.
pub async fn fetch_catalog(client: &DataClient, url: &str) -> Result<Catalog, LoaderError> {
    let document = client.fetch_json(url).await?;
    Ok(Catalog::from_value(&document))
}

/// Fetch and normalise the store list.
///
/// # Errors
///
/// Propagates [`DataClient::fetch_json`] failures.
pub async fn fetch_stores(client: &DataClient, url: &str) -> Result<StoreList, LoaderError> {
    let document = client.fetch_json(url).await?;
    Ok(StoreList::from_value(&document))
}

/// Fetch both documents for `variant` concurrently.
///
/// Each collection falls back to empty on its own; one failing does not
/// discard the other.
pub async fn load_variant(client: &DataClient, variant: &VariantConfig) -> LoadedData {
    let (catalog_url, stores_url) = if variant.cache_bust {
        let token = cache_buster_token();
        (
            with_cache_buster(&variant.catalog_url, &token),
            with_cache_buster(&variant.stores_url, &token),
        )
    } else {
        (variant.catalog_url.clone(), variant.stores_url.clone())
    };

    let (catalog, stores) = futures::join!(
        fetch_catalog(client, &catalog_url),
        fetch_stores(client, &stores_url)
    );

    let catalog = catalog.unwrap_or_else(|e| {
        tracing::error!(variant = %variant.slug, error = %e, "error loading product catalog");
        Catalog::default()
    });
    let stores = stores.unwrap_or_else(|e| {
        tracing::error!(variant = %variant.slug, error = %e, "error loading stores");
        StoreList::default()
    });

    tracing::info!(
        variant = %variant.slug,
        products = catalog.len(),
        stores = stores.len(),
        located = stores.located_count(),
        "variant data loaded"
    );

    LoadedData { catalog, stores }
}
