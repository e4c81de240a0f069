//! Coordinates and great-circle distance.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the distance labels, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A finite latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Returns `None` unless both components are finite.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Haversine distance between two points, in miles.
#[must_use]
pub fn haversine_miles(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = to_radians(to.lat - from.lat);
    let d_lng = to_radians(to.lng - from.lng);

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + to_radians(from.lat).cos()
            * to_radians(to.lat).cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Coerce a JSON coordinate that may arrive as a number or a numeric string.
///
/// Blank strings, booleans and non-finite values are rejected.
pub(crate) fn coerce_coordinate(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
