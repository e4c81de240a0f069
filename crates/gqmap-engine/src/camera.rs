//! Camera targets handed back to the map component.

use serde::Serialize;

use crate::geo::GeoPoint;

/// Zoom used when flying to a store from its marker or list entry.
pub const STORE_FOCUS_ZOOM: f64 = 14.0;
/// Zoom used when flying to a geocoded search result.
pub const SEARCH_RESULT_ZOOM: f64 = 12.0;

/// Where the map should move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTarget {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl CameraTarget {
    #[must_use]
    pub fn store(position: GeoPoint) -> Self {
        Self {
            center: position,
            zoom: STORE_FOCUS_ZOOM,
        }
    }

    #[must_use]
    pub fn search_result(position: GeoPoint) -> Self {
        Self {
            center: position,
            zoom: SEARCH_RESULT_ZOOM,
        }
    }
}
