pub mod client;
pub mod data;
pub mod error;
pub mod geocode;

pub use client::{cache_buster_token, with_cache_buster, DataClient};
pub use data::{fetch_catalog, fetch_stores, load_variant, LoadedData};
pub use error::LoaderError;
pub use geocode::{search_location, MapboxGeocoder, SearchOutcome, LOCATION_NOT_FOUND_NOTICE};
