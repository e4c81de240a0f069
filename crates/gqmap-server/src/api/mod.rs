mod render;
mod search;
mod variants;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use gqmap_core::{VariantConfig, VariantsFile};
use gqmap_engine::LocatorSession;
use gqmap_loader::{load_variant, DataClient, MapboxGeocoder};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// The session together with the variant its data came from. Kept under a
/// single lock so the two never disagree.
#[derive(Debug)]
pub struct LocatorState {
    pub variant: VariantConfig,
    pub session: LocatorSession,
}

#[derive(Clone)]
pub struct AppState {
    pub locator: Arc<RwLock<LocatorState>>,
    pub variants: Arc<VariantsFile>,
    pub data_client: DataClient,
    /// `None` when no access token is configured; search is disabled.
    pub geocoder: Option<Arc<MapboxGeocoder>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    variant: String,
    products: usize,
    stores: usize,
    search: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "not_ready" | "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Counts reported after a variant's data has been swapped in.
#[derive(Debug, Serialize)]
pub struct ReloadSummary {
    pub variant: String,
    pub products: usize,
    pub stores: usize,
    pub located: usize,
}

/// Fetch `variant`'s data and swap it into the session.
///
/// The fetch happens without holding the lock; renders keep using the
/// previous collections until the swap.
pub async fn reload_variant(state: &AppState, variant: VariantConfig) -> ReloadSummary {
    let loaded = load_variant(&state.data_client, &variant).await;
    let summary = ReloadSummary {
        variant: variant.slug.clone(),
        products: loaded.catalog.len(),
        stores: loaded.stores.len(),
        located: loaded.stores.located_count(),
    };

    let mut locator = state.locator.write().await;
    loaded.apply_to(&mut locator.session);
    locator.variant = variant;
    drop(locator);

    tracing::info!(
        variant = %summary.variant,
        products = summary.products,
        stores = summary.stores,
        "session data replaced"
    );
    summary
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn search_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/search", get(search::search_location))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/variants", get(variants::list_variants))
        .route("/api/v1/render", get(render::render_viewport))
        .route("/api/v1/reload", post(variants::reload));

    Router::new()
        .merge(public_routes)
        .merge(search_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let search = if state.geocoder.is_some() {
        "enabled"
    } else {
        "disabled"
    };

    let locator = state.locator.read().await;
    let snapshot = locator.session.snapshot();
    let ready = locator.session.is_ready();
    let variant = locator.variant.slug.clone();
    drop(locator);

    let data = HealthData {
        status: if ready { "ok" } else { "loading" },
        variant,
        products: snapshot.catalog.len(),
        stores: snapshot.stores.len(),
        search,
    };
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse { data, meta }))
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
