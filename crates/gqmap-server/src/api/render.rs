use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use gqmap_engine::{Bounds, GeoPoint, RenderPlan, UserLocation, Viewport, SEARCH_RESULT_ZOOM};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_WIDTH_PX: u32 = 1280;
const DEFAULT_HEIGHT_PX: u32 = 800;

/// Viewport description, in one of three forms:
/// - all four bounds;
/// - a camera centre (`center_lat`/`center_lng`), e.g. a search result;
/// - neither, and the camera is centred on the user.
///
/// Distances are always measured from the user, not the camera.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RenderQuery {
    pub south: Option<f64>,
    pub north: Option<f64>,
    pub west: Option<f64>,
    pub east: Option<f64>,
    pub zoom: Option<f64>,
    /// Camera centre. Both or neither; not combined with bounds.
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    /// Device location. Both or neither.
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct RenderData {
    pub variant: String,
    pub user: UserLocation,
    pub viewport: Viewport,
    pub plan: RenderPlan,
}

fn device_location(query: &RenderQuery) -> Result<Option<GeoPoint>, String> {
    match (query.lat, query.lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)
            .map(Some)
            .ok_or_else(|| "lat and lng must be finite numbers".to_string()),
        _ => Err("lat and lng must be given together".to_string()),
    }
}

fn camera_center(query: &RenderQuery) -> Result<Option<GeoPoint>, String> {
    match (query.center_lat, query.center_lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)
            .map(Some)
            .ok_or_else(|| "center_lat and center_lng must be finite numbers".to_string()),
        _ => Err("center_lat and center_lng must be given together".to_string()),
    }
}

fn viewport_for(query: &RenderQuery, user: &UserLocation) -> Result<Viewport, String> {
    let width = query.width.unwrap_or(DEFAULT_WIDTH_PX);
    let height = query.height.unwrap_or(DEFAULT_HEIGHT_PX);
    let center = camera_center(query)?;

    if query.zoom.is_some_and(|z| !z.is_finite()) {
        return Err("zoom must be a finite number".to_string());
    }

    match (query.south, query.north, query.west, query.east) {
        (Some(south), Some(north), Some(west), Some(east)) => {
            if center.is_some() {
                return Err("give either bounds or center_lat/center_lng, not both".to_string());
            }
            if ![south, north, west, east].iter().all(|v| v.is_finite()) {
                return Err("south, north, west and east must be finite numbers".to_string());
            }
            Ok(Viewport {
                bounds: Bounds {
                    south,
                    north,
                    west,
                    east,
                },
                zoom: query.zoom.unwrap_or_else(|| user.initial_zoom(width)),
            })
        }
        (None, None, None, None) => Ok(match center {
            Some(center) => {
                let zoom = query.zoom.unwrap_or(SEARCH_RESULT_ZOOM);
                Viewport::from_camera(center, zoom, width, height)
            }
            None => {
                let zoom = query.zoom.unwrap_or_else(|| user.initial_zoom(width));
                Viewport::from_camera(user.point, zoom, width, height)
            }
        }),
        _ => Err("south, north, west and east must be given together".to_string()),
    }
}

pub(super) async fn render_viewport(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RenderQuery>,
) -> Result<Json<ApiResponse<RenderData>>, ApiError> {
    let invalid = |message: String| ApiError::new(req_id.0.clone(), "validation_error", message);

    let device = device_location(&query).map_err(invalid)?;

    let locator = state.locator.read().await;
    if !locator.session.is_ready() {
        return Err(ApiError::new(
            req_id.0.clone(),
            "not_ready",
            "store data is still loading",
        ));
    }
    let mut snapshot = locator.session.snapshot();
    let variant = locator.variant.slug.clone();
    drop(locator);

    if let Some(point) = device {
        snapshot.user = UserLocation::resolve(Some(point), snapshot.user.point);
    }
    let viewport = viewport_for(&query, &snapshot.user).map_err(invalid)?;

    let plan = snapshot.render(&viewport);

    Ok(Json(ApiResponse {
        data: RenderData {
            variant,
            user: snapshot.user,
            viewport,
            plan,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
