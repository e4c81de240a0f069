//! Store records and the store list.

use serde::Serialize;
use serde_json::Value;

use crate::fields::{first_value, text_field};
use crate::geo::{coerce_coordinate, GeoPoint};
use crate::upc::{normalize_available_upcs, Upc};

const DEFAULT_STORE_LABEL: &str = "Store";

/// A retail location from the store-list document.
///
/// Stores carry no identifier; their index in the [`StoreList`] is the only
/// handle that stays stable for the duration of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Store {
    pub name: Option<String>,
    pub retailer: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    /// `None` when either coordinate is missing or unparsable; such stores
    /// never appear on the map or in the list.
    pub position: Option<GeoPoint>,
    pub available_upcs: Vec<Upc>,
}

impl Store {
    /// Build a store from one record of the store-list document.
    ///
    /// Returns `None` only when the record is not a JSON object. Every field
    /// is optional; malformed values are treated as absent.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;

        let lat = first_value(record, &["latitude", "lat"]).and_then(coerce_coordinate);
        let lng = first_value(record, &["longitude", "lng", "lon"]).and_then(coerce_coordinate);
        let position = lat.zip(lng).and_then(|(lat, lng)| GeoPoint::new(lat, lng));

        let available_upcs = first_value(record, &["available_upcs", "upcs"])
            .map(normalize_available_upcs)
            .unwrap_or_default();

        Some(Self {
            name: text_field(record, &["name"]),
            retailer: text_field(record, &["retailer"]),
            address: text_field(record, &["address"]),
            phone: text_field(record, &["phone"]),
            logo_url: text_field(record, &["logo_url", "logo"]),
            position,
            available_upcs,
        })
    }

    /// Popup title: name, then retailer, then a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.retailer.as_deref())
            .unwrap_or(DEFAULT_STORE_LABEL)
    }

    /// List heading: retailer, then name, then a generic label.
    #[must_use]
    pub fn retailer_label(&self) -> &str {
        self.retailer
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(DEFAULT_STORE_LABEL)
    }
}

/// The full store collection for one data source.
///
/// Replaced wholesale on reload, never edited in place.
#[derive(Debug, Clone, Default)]
pub struct StoreList {
    stores: Vec<Store>,
}

impl StoreList {
    /// Build the list from the raw store-list document.
    ///
    /// Anything other than a top-level array yields an empty list. Non-object
    /// entries are dropped.
    #[must_use]
    pub fn from_value(document: &Value) -> Self {
        let Some(records) = document.as_array() else {
            tracing::warn!("store document is not an array; using empty store list");
            return Self::default();
        };

        let list = Self::from_stores(records.iter().filter_map(Store::from_value).collect());
        let unlocated = list.len() - list.located_count();
        if unlocated > 0 {
            tracing::debug!(
                stores = list.len(),
                unlocated,
                "stores without usable coordinates will never be shown"
            );
        }
        list
    }

    #[must_use]
    pub fn from_stores(stores: Vec<Store>) -> Self {
        Self { stores }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Store> {
        self.stores.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Store> {
        self.stores.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Number of stores with a usable position.
    #[must_use]
    pub fn located_count(&self) -> usize {
        self.stores.iter().filter(|s| s.position.is_some()).count()
    }
}

impl<'a> IntoIterator for &'a StoreList {
    type Item = &'a Store;
    type IntoIter = std::slice::Iter<'a, Store>;

    fn into_iter(self) -> Self::IntoIter {
        self.stores.iter()
    }
}
