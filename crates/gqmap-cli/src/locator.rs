//! Command handlers for the CLI.
//!
//! Handlers print to stdout; logs go to stderr so `--json` output can be
//! piped.

use anyhow::Context;

use gqmap_core::AppConfig;
use gqmap_engine::{
    Bounds, CameraTarget, GeoPoint, LocatorSession, RenderOptions, RenderPlan, ResolvedProduct,
    UserLocation, Viewport,
};
use gqmap_loader::{load_variant, search_location, DataClient, MapboxGeocoder, SearchOutcome};

use crate::NearbyArgs;

pub(crate) fn run_variants(config: &AppConfig) -> anyhow::Result<()> {
    let variants = gqmap_core::resolve_variants(config.variants_path.as_deref())?;

    for variant in &variants.variants {
        let marker = if variant.slug.eq_ignore_ascii_case(&config.default_variant) {
            "*"
        } else {
            " "
        };
        let cache = if variant.cache_bust { " (cache-busted)" } else { "" };
        println!("{marker} {:<10} {}{cache}", variant.slug, variant.label);
    }

    Ok(())
}

/// Device location from `--lat/--lng`, if both are present and finite.
fn device_location(args: &NearbyArgs) -> anyhow::Result<Option<GeoPoint>> {
    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)
            .map(Some)
            .context("--lat/--lng must be finite numbers"),
        _ => Ok(None),
    }
}

/// Bounds win over a camera target; without either the camera is centred
/// on the user.
pub(crate) fn viewport_for(
    args: &NearbyArgs,
    user: &UserLocation,
    camera: Option<CameraTarget>,
) -> anyhow::Result<Viewport> {
    if args.zoom.is_some_and(|z| !z.is_finite()) {
        anyhow::bail!("--zoom must be a finite number");
    }

    if let (Some(south), Some(north), Some(west), Some(east)) =
        (args.south, args.north, args.west, args.east)
    {
        if ![south, north, west, east].iter().all(|v| v.is_finite()) {
            anyhow::bail!("--south/--north/--west/--east must be finite numbers");
        }
        return Ok(Viewport {
            bounds: Bounds {
                south,
                north,
                west,
                east,
            },
            zoom: args.zoom.unwrap_or_else(|| user.initial_zoom(args.width)),
        });
    }

    Ok(match camera {
        Some(target) => Viewport::from_camera(
            target.center,
            args.zoom.unwrap_or(target.zoom),
            args.width,
            args.height,
        ),
        None => Viewport::from_camera(
            user.point,
            args.zoom.unwrap_or_else(|| user.initial_zoom(args.width)),
            args.width,
            args.height,
        ),
    })
}

fn build_geocoder(config: &AppConfig) -> anyhow::Result<MapboxGeocoder> {
    let token = config
        .mapbox_token
        .as_deref()
        .context("GQMAP_MAPBOX_TOKEN must be set to search")?;

    MapboxGeocoder::with_base_url(
        token,
        config.request_timeout_secs,
        &config.user_agent,
        &config.geocode_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build geocoder: {e}"))
}

pub(crate) async fn run_nearby(config: &AppConfig, args: &NearbyArgs) -> anyhow::Result<()> {
    let variants = gqmap_core::resolve_variants(config.variants_path.as_deref())?;
    let slug = args.variant.as_deref().unwrap_or(&config.default_variant);
    let variant = variants.require(slug)?;

    let fallback = GeoPoint::new(config.fallback_lat, config.fallback_lng)
        .context("fallback location must be finite")?;
    let user = UserLocation::resolve(device_location(args)?, fallback);

    let camera = match args.near.as_deref() {
        Some(query) => match search_location(&build_geocoder(config)?, query).await {
            SearchOutcome::Found(target) => Some(target),
            SearchOutcome::EmptyQuery => None,
            outcome @ SearchOutcome::NotFound => {
                println!("{}", outcome.notice().unwrap_or_default());
                return Ok(());
            }
            SearchOutcome::Failed => anyhow::bail!("location search failed; see logs"),
        },
        None => None,
    };

    let client = DataClient::new(config.request_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build data client: {e}"))?;

    let mut session = LocatorSession::new(
        user,
        RenderOptions {
            min_zoom: config.min_zoom,
            nearest_limit: config.nearest_limit,
        },
    );
    load_variant(&client, variant).await.apply_to(&mut session);

    let viewport = viewport_for(args, &user, camera)?;
    tracing::debug!(
        variant = %variant.slug,
        zoom = viewport.zoom,
        south = viewport.bounds.south,
        north = viewport.bounds.north,
        west = viewport.bounds.west,
        east = viewport.bounds.east,
        "rendering viewport"
    );
    let plan = session
        .render(&viewport)
        .context("session not ready after load")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&variant.label, &user, &plan);
    }

    Ok(())
}

fn print_plan(label: &str, user: &UserLocation, plan: &RenderPlan) {
    println!("{label}: searching from {} ({:?})", user.point, user.source);

    if let Some(reason) = plan.hidden_reason {
        match reason {
            gqmap_engine::HiddenReason::ZoomedOut => {
                println!("zoomed out too far; zoom in to see stores");
            }
            gqmap_engine::HiddenReason::NoStoresInView => println!("no stores in view"),
        }
        return;
    }

    println!(
        "{} stores in view, nearest {}:",
        plan.markers.len(),
        plan.list.len()
    );
    for entry in &plan.list {
        println!(
            "{:>2}. {} ({})",
            entry.rank, entry.retailer, entry.distance_label
        );
        if let Some(address) = &entry.address {
            println!("    {address}");
        }
        if let Some(phone) = &entry.phone {
            println!("    {phone}");
        }
        if let Some(notice) = &entry.notice {
            println!("    {notice}");
        }
        for product in &entry.products {
            match product {
                ResolvedProduct::Known { name, .. } => println!("    - {name}"),
                ResolvedProduct::Unknown { .. } => println!("    - {}", product.label()),
            }
        }
    }
}

pub(crate) async fn run_search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let geocoder = build_geocoder(config)?;

    match search_location(&geocoder, query).await {
        SearchOutcome::EmptyQuery => println!("nothing to search for"),
        SearchOutcome::Found(target) => {
            println!("{} (zoom {})", target.center, target.zoom);
        }
        outcome @ SearchOutcome::NotFound => {
            println!("{}", outcome.notice().unwrap_or_default());
        }
        SearchOutcome::Failed => anyhow::bail!("location search failed; see logs"),
    }

    Ok(())
}
