//! Viewport bounds and the visible-store filter.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::store::{Store, StoreList};

/// Below this zoom level no markers and no list are shown.
pub const MIN_ZOOM_TO_SHOW_MARKERS: f64 = 8.0;

/// Web-Mercator tile edge in pixels (vector-tile maps use 512).
const TILE_SIZE_PX: f64 = 512.0;
/// Latitude limit of the Web-Mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl Bounds {
    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }
}

/// What the map currently shows. Supplied by the caller of each pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub bounds: Bounds,
    pub zoom: f64,
}

impl Viewport {
    /// Derive the viewport a map of `width_px` × `height_px` would show when
    /// centred on `center` at `zoom`.
    ///
    /// Used by surfaces that have no map component to ask.
    #[must_use]
    pub fn from_camera(center: GeoPoint, zoom: f64, width_px: u32, height_px: u32) -> Self {
        let world_px = TILE_SIZE_PX * zoom.exp2();
        let (cx, cy) = project(center, world_px);
        let half_w = f64::from(width_px) / 2.0;
        let half_h = f64::from(height_px) / 2.0;

        let north_west = unproject(cx - half_w, cy - half_h, world_px);
        let south_east = unproject(cx + half_w, cy + half_h, world_px);

        Self {
            bounds: Bounds {
                south: south_east.lat,
                north: north_west.lat,
                west: north_west.lng,
                east: south_east.lng,
            },
            zoom,
        }
    }
}

fn project(point: GeoPoint, world_px: f64) -> (f64, f64) {
    let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT) * PI / 180.0;
    let x = (point.lng + 180.0) / 360.0 * world_px;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * world_px;
    (x, y)
}

fn unproject(x: f64, y: f64, world_px: f64) -> GeoPoint {
    let lng = x / world_px * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / world_px)).sinh().atan() * 180.0 / PI;
    GeoPoint {
        lat: lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT),
        lng,
    }
}

/// Why a pass shows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenReason {
    ZoomedOut,
    NoStoresInView,
}

/// A store that passed the bounds test, with its list position.
#[derive(Debug, Clone, Copy)]
pub struct VisibleStore<'a> {
    pub index: usize,
    pub store: &'a Store,
    pub position: GeoPoint,
}

/// Outcome of the viewport filter.
///
/// `Hidden` tells the presentation layer to drop every marker, hide the list
/// and give the map the full height.
#[derive(Debug, Clone)]
pub enum Visibility<'a> {
    Hidden(HiddenReason),
    Visible(Vec<VisibleStore<'a>>),
}

impl<'a> Visibility<'a> {
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden(_))
    }

    #[must_use]
    pub fn stores(&self) -> &[VisibleStore<'a>] {
        match self {
            Self::Hidden(_) => &[],
            Self::Visible(stores) => stores,
        }
    }
}

/// Select the stores inside `viewport`, in collection order.
///
/// Unlocated stores are skipped at every zoom level. A zoom below `min_zoom`
/// (or a NaN zoom) hides everything regardless of how many stores are
/// in view.
#[must_use]
pub fn filter_visible<'a>(
    stores: &'a StoreList,
    viewport: &Viewport,
    min_zoom: f64,
) -> Visibility<'a> {
    if viewport.zoom.is_nan() || viewport.zoom < min_zoom {
        tracing::debug!(zoom = viewport.zoom, min_zoom, "zoomed out; hiding stores");
        return Visibility::Hidden(HiddenReason::ZoomedOut);
    }

    let visible: Vec<VisibleStore<'a>> = stores
        .iter()
        .enumerate()
        .filter_map(|(index, store)| {
            let position = store.position?;
            viewport.bounds.contains(position).then_some(VisibleStore {
                index,
                store,
                position,
            })
        })
        .collect();

    if visible.is_empty() {
        return Visibility::Hidden(HiddenReason::NoStoresInView);
    }

    tracing::debug!(visible = visible.len(), total = stores.len(), "stores in view");
    Visibility::Visible(visible)
}
