//! The presentation adapter: one render pass from data to a [`RenderPlan`].
//!
//! A plan is plain data. Whatever draws it (a browser map, the CLI, the HTTP
//! API) owns the actual markers and list; this module owns no state and does
//! no I/O.

use serde::Serialize;

use crate::camera::CameraTarget;
use crate::catalog::Catalog;
use crate::geo::GeoPoint;
use crate::rank::{rank_nearest, RankedStore, NEAREST_STORE_LIMIT};
use crate::resolve::{resolve_products, ResolvedProduct};
use crate::store::{Store, StoreList};
use crate::viewport::{
    filter_visible, HiddenReason, Viewport, Visibility, VisibleStore, MIN_ZOOM_TO_SHOW_MARKERS,
};

const NO_UPCS_NOTICE: &str = "No UPCs listed";

/// Page layout for the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Store list visible beside the map.
    Sidebar,
    /// List hidden; the map takes the full height.
    FullMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
}

/// Place one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerCommand {
    /// Position of the store in the loaded list.
    pub index: usize,
    pub position: GeoPoint,
    pub logo_url: Option<String>,
    pub popup: Popup,
    pub on_click: CameraTarget,
}

/// One row of the nearest-stores list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    /// 1-based rank by distance.
    pub rank: usize,
    pub index: usize,
    pub retailer: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub distance_miles: f64,
    pub distance_label: String,
    pub products: Vec<ResolvedProduct>,
    /// Set when the store lists no products at all.
    pub notice: Option<String>,
    pub on_click: CameraTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub layout: Layout,
    pub hidden_reason: Option<HiddenReason>,
    /// Every visible store. Markers replace the previous pass's markers.
    pub markers: Vec<MarkerCommand>,
    /// The nearest visible stores, nearest first.
    pub list: Vec<ListEntry>,
}

impl RenderPlan {
    #[must_use]
    pub fn hidden(reason: HiddenReason) -> Self {
        Self {
            layout: Layout::FullMap,
            hidden_reason: Some(reason),
            markers: Vec::new(),
            list: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.layout == Layout::FullMap
    }
}

/// Tunables for a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub min_zoom: f64,
    pub nearest_limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM_TO_SHOW_MARKERS,
            nearest_limit: NEAREST_STORE_LIMIT,
        }
    }
}

/// Distance label with one decimal, e.g. `"2.4 mi"`.
#[must_use]
pub fn format_distance(miles: f64) -> String {
    // `{:.1}` breaks exact ties to even; distance labels round them up.
    let tenths = miles * 10.0;
    let exact_tie =
        (tenths.fract().abs() - 0.5).abs() < f64::EPSILON && miles.mul_add(10.0, -tenths) == 0.0;
    if exact_tie {
        format!("{:.1} mi", tenths.round() / 10.0)
    } else {
        format!("{miles:.1} mi")
    }
}

/// Run one pass: filter by viewport, rank by distance, resolve products.
#[must_use]
pub fn render_pass(
    stores: &StoreList,
    catalog: &Catalog,
    user: GeoPoint,
    viewport: &Viewport,
    options: &RenderOptions,
) -> RenderPlan {
    let visible = match filter_visible(stores, viewport, options.min_zoom) {
        Visibility::Hidden(reason) => return RenderPlan::hidden(reason),
        Visibility::Visible(visible) => visible,
    };

    let markers = visible.iter().map(marker_for).collect();
    let list = rank_nearest(user, &visible, options.nearest_limit)
        .iter()
        .enumerate()
        .map(|(i, ranked)| list_entry_for(i + 1, ranked, catalog))
        .collect();

    RenderPlan {
        layout: Layout::Sidebar,
        hidden_reason: None,
        markers,
        list,
    }
}

fn marker_for(visible: &VisibleStore<'_>) -> MarkerCommand {
    let store: &Store = visible.store;
    MarkerCommand {
        index: visible.index,
        position: visible.position,
        logo_url: store.logo_url.clone(),
        popup: Popup {
            title: store.display_name().to_string(),
            address: store.address.clone(),
            phone: store.phone.clone(),
            logo_url: store.logo_url.clone(),
        },
        on_click: CameraTarget::store(visible.position),
    }
}

fn list_entry_for(rank: usize, ranked: &RankedStore<'_>, catalog: &Catalog) -> ListEntry {
    let store = ranked.store;
    let products = resolve_products(store, catalog);
    let notice = products.is_empty().then(|| NO_UPCS_NOTICE.to_string());

    ListEntry {
        rank,
        index: ranked.index,
        retailer: store.retailer_label().to_string(),
        address: store.address.clone(),
        phone: store.phone.clone(),
        logo_url: store.logo_url.clone(),
        distance_miles: ranked.distance_miles,
        distance_label: format_distance(ranked.distance_miles),
        products,
        notice,
        on_click: CameraTarget::store(ranked.position),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
