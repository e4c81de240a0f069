//! Visible-store selection and ranking for the store locator.
//!
//! Everything in this crate is pure: data in, plain data out. Fetching the
//! JSON documents lives in `gqmap-loader`; drawing the result is left to
//! whatever consumes a [`RenderPlan`].

pub mod camera;
pub mod catalog;
mod fields;
pub mod geo;
pub mod location;
pub mod rank;
pub mod render;
pub mod resolve;
pub mod session;
pub mod store;
pub mod upc;
pub mod viewport;

pub use camera::{CameraTarget, SEARCH_RESULT_ZOOM, STORE_FOCUS_ZOOM};
pub use catalog::{Catalog, Product};
pub use geo::{haversine_miles, GeoPoint, EARTH_RADIUS_MILES};
pub use location::{LocationSource, UserLocation, FALLBACK_LOCATION};
pub use rank::{rank_nearest, RankedStore, NEAREST_STORE_LIMIT};
pub use render::{
    format_distance, render_pass, Layout, ListEntry, MarkerCommand, Popup, RenderOptions,
    RenderPlan,
};
pub use resolve::{resolve_products, ResolvedProduct};
pub use session::{LocatorSession, SessionSnapshot};
pub use store::{Store, StoreList};
pub use upc::{normalize_available_upcs, normalize_upc, Upc};
pub use viewport::{
    filter_visible, Bounds, HiddenReason, Viewport, Visibility, VisibleStore,
    MIN_ZOOM_TO_SHOW_MARKERS,
};
