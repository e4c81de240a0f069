mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use gqmap_engine::{GeoPoint, LocatorSession, RenderOptions, UserLocation};
use gqmap_loader::{DataClient, MapboxGeocoder};

use crate::api::{build_app, default_rate_limit_state, reload_variant, AppState, LocatorState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = gqmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting gqmap-server");

    let variants = gqmap_core::resolve_variants(config.variants_path.as_deref())?;
    let variant = variants.require(&config.default_variant)?.clone();

    let fallback = GeoPoint::new(config.fallback_lat, config.fallback_lng)
        .context("fallback location must be finite")?;
    let session = LocatorSession::new(
        UserLocation::resolve(None, fallback),
        RenderOptions {
            min_zoom: config.min_zoom,
            nearest_limit: config.nearest_limit,
        },
    );

    let data_client = DataClient::new(config.request_timeout_secs, &config.user_agent)?;
    let geocoder = config
        .mapbox_token
        .as_deref()
        .map(|token| {
            MapboxGeocoder::with_base_url(
                token,
                config.request_timeout_secs,
                &config.user_agent,
                &config.geocode_base_url,
            )
        })
        .transpose()?
        .map(Arc::new);
    if geocoder.is_none() {
        tracing::warn!("GQMAP_MAPBOX_TOKEN not set; location search disabled");
    }

    let state = AppState {
        locator: Arc::new(RwLock::new(LocatorState {
            variant: variant.clone(),
            session,
        })),
        variants: Arc::new(variants),
        data_client,
        geocoder,
    };

    // Serve immediately; routes report "loading" until the first load lands.
    let initial = state.clone();
    tokio::spawn(async move {
        reload_variant(&initial, variant).await;
    });

    let app = build_app(state, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
