use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{reload_variant, ApiError, ApiResponse, AppState, ReloadSummary, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct VariantItem {
    pub slug: String,
    pub label: String,
    pub cache_bust: bool,
    pub active: bool,
}

pub(super) async fn list_variants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<VariantItem>>> {
    let active = state.locator.read().await.variant.slug.clone();

    let data = state
        .variants
        .variants
        .iter()
        .map(|v| VariantItem {
            slug: v.slug.clone(),
            label: v.label.clone(),
            cache_bust: v.cache_bust,
            active: v.slug.eq_ignore_ascii_case(&active),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

#[derive(Debug, Deserialize)]
pub(super) struct ReloadQuery {
    /// Switch to this variant; omitted reloads the active one.
    pub variant: Option<String>,
}

pub(super) async fn reload(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReloadQuery>,
) -> Result<Json<ApiResponse<ReloadSummary>>, ApiError> {
    let variant = match query.variant.as_deref() {
        Some(slug) => state
            .variants
            .find(slug)
            .cloned()
            .ok_or_else(|| {
                ApiError::new(
                    req_id.0.clone(),
                    "not_found",
                    format!("unknown variant '{}'", slug.trim()),
                )
            })?,
        None => state.locator.read().await.variant.clone(),
    };

    let data = reload_variant(&state, variant).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
