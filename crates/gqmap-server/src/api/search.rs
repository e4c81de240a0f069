use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use gqmap_engine::CameraTarget;
use gqmap_loader::SearchOutcome;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub(super) struct SearchData {
    pub outcome: &'static str,
    /// Where to move the map, when a match was found.
    pub camera: Option<CameraTarget>,
    pub notice: Option<&'static str>,
}

impl From<SearchOutcome> for SearchData {
    fn from(outcome: SearchOutcome) -> Self {
        let (label, camera) = match outcome {
            SearchOutcome::EmptyQuery => ("empty_query", None),
            SearchOutcome::Found(target) => ("found", Some(target)),
            SearchOutcome::NotFound => ("not_found", None),
            SearchOutcome::Failed => ("failed", None),
        };
        Self {
            outcome: label,
            camera,
            notice: outcome.notice(),
        }
    }
}

pub(super) async fn search_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let Some(geocoder) = state.geocoder.as_deref() else {
        return Err(ApiError::new(
            req_id.0,
            "unavailable",
            "location search is not configured",
        ));
    };

    let outcome = gqmap_loader::search_location(geocoder, &query.q).await;

    Ok(Json(ApiResponse {
        data: SearchData::from(outcome),
        meta: ResponseMeta::new(req_id.0),
    }))
}
