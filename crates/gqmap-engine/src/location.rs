//! Where the user is, decided once at startup.

use serde::Serialize;

use crate::geo::GeoPoint;

/// Used whenever the device cannot (or will not) report a position.
pub const FALLBACK_LOCATION: GeoPoint = GeoPoint {
    lat: 39.4015,
    lng: -76.6053,
};

/// Viewports at or below this width get the mobile zoom levels.
pub const MOBILE_MAX_WIDTH_PX: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Device,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserLocation {
    pub point: GeoPoint,
    pub source: LocationSource,
}

impl UserLocation {
    /// Prefer the device position; fall back to `fallback` when it is absent.
    #[must_use]
    pub fn resolve(device: Option<GeoPoint>, fallback: GeoPoint) -> Self {
        match device {
            Some(point) => Self {
                point,
                source: LocationSource::Device,
            },
            None => {
                tracing::info!(
                    lat = fallback.lat,
                    lng = fallback.lng,
                    "device location unavailable; using fallback"
                );
                Self {
                    point: fallback,
                    source: LocationSource::Fallback,
                }
            }
        }
    }

    /// Zoom for the first camera: closer in when the device position is
    /// known, one level further out on narrow screens.
    #[must_use]
    pub fn initial_zoom(&self, viewport_width_px: u32) -> f64 {
        let mobile = viewport_width_px <= MOBILE_MAX_WIDTH_PX;
        match (self.source, mobile) {
            (LocationSource::Device, false) => 13.0,
            (LocationSource::Device, true) | (LocationSource::Fallback, false) => 10.0,
            (LocationSource::Fallback, true) => 9.0,
        }
    }
}
