use serde_json::json;

use super::*;
use crate::geo::EARTH_RADIUS_MILES;
use crate::viewport::Bounds;

/// Latitude `miles` due north of `lat`.
fn north_of(lat: f64, miles: f64) -> f64 {
    lat + (miles / EARTH_RADIUS_MILES).to_degrees()
}

fn baltimore_viewport(zoom: f64) -> Viewport {
    Viewport {
        bounds: Bounds {
            south: 39.0,
            north: 39.8,
            west: -77.0,
            east: -76.0,
        },
        zoom,
    }
}

fn user() -> GeoPoint {
    GeoPoint {
        lat: 39.40,
        lng: -76.61,
    }
}

fn catalog() -> Catalog {
    Catalog::from_value(&json!([
        {"UPC": "850000123456", "Name": "Honey Oat", "Image": "https://img/honey.png"},
        {"UPC": 12345, "Name": "Maple Pecan", "Image": "https://img/maple.png"}
    ]))
}

fn three_store_list() -> StoreList {
    StoreList::from_value(&json!([
        {
            "name": "Ten Mile Market",
            "retailer": "Costco",
            "latitude": north_of(39.40, 10.0),
            "longitude": -76.61,
            "available_upcs": ["850000123456"]
        },
        {
            "name": "Half Mile Grocer",
            "retailer": "Target",
            "address": "1 York Rd",
            "phone": "410-555-0100",
            "logo_url": "https://logo/target.png",
            "latitude": north_of(39.40, 0.5).to_string(),
            "longitude": "-76.61",
            "available_upcs": "12345,000000000000"
        },
        {
            "retailer": "ChaCha",
            "latitude": north_of(39.40, 2.0),
            "longitude": -76.61
        },
        {"name": "Out of view", "latitude": 41.0, "longitude": -76.61},
        {"name": "Broken coords", "latitude": "??", "longitude": -76.61}
    ]))
}

#[test]
fn end_to_end_ranks_three_stores_in_view() {
    let plan = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(10.0),
        &RenderOptions::default(),
    );

    assert_eq!(plan.layout, Layout::Sidebar);
    assert!(plan.hidden_reason.is_none());
    assert_eq!(plan.markers.len(), 3, "all three in-view stores get markers");

    let order: Vec<&str> = plan.list.iter().map(|e| e.retailer.as_str()).collect();
    assert_eq!(order, vec!["Target", "ChaCha", "Costco"]);

    let labels: Vec<&str> = plan.list.iter().map(|e| e.distance_label.as_str()).collect();
    assert_eq!(labels, vec!["0.5 mi", "2.0 mi", "10.0 mi"]);

    for (entry, expected) in plan.list.iter().zip([0.5, 2.0, 10.0]) {
        assert!(
            (entry.distance_miles - expected).abs() < 1e-6,
            "{} expected {expected}, got {}",
            entry.retailer,
            entry.distance_miles
        );
    }

    let ranks: Vec<usize> = plan.list.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn markers_follow_collection_order_and_carry_popups() {
    let plan = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(10.0),
        &RenderOptions::default(),
    );

    let indices: Vec<usize> = plan.markers.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    let grocer = &plan.markers[1];
    assert_eq!(grocer.popup.title, "Half Mile Grocer");
    assert_eq!(grocer.popup.address.as_deref(), Some("1 York Rd"));
    assert_eq!(grocer.popup.phone.as_deref(), Some("410-555-0100"));
    assert_eq!(grocer.logo_url.as_deref(), Some("https://logo/target.png"));
    assert_eq!(grocer.on_click.center, grocer.position);
    assert!((grocer.on_click.zoom - 14.0).abs() < f64::EPSILON);

    // No name: the popup title falls back to the retailer.
    assert_eq!(plan.markers[2].popup.title, "ChaCha");
}

#[test]
fn unknown_upc_renders_placeholder() {
    let plan = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(10.0),
        &RenderOptions::default(),
    );

    let grocer = &plan.list[0];
    let labels: Vec<String> = grocer.products.iter().map(ResolvedProduct::label).collect();
    assert_eq!(labels, vec!["Maple Pecan", "Unknown UPC: 000000000000"]);
    assert!(grocer.notice.is_none());
}

#[test]
fn store_without_upcs_gets_notice() {
    let plan = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(10.0),
        &RenderOptions::default(),
    );

    let chacha = &plan.list[1];
    assert!(chacha.products.is_empty());
    assert_eq!(chacha.notice.as_deref(), Some("No UPCs listed"));
}

#[test]
fn zoomed_out_pass_hides_list_and_markers() {
    let plan = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(7.0),
        &RenderOptions::default(),
    );
    assert!(plan.is_hidden());
    assert_eq!(plan.hidden_reason, Some(HiddenReason::ZoomedOut));
    assert!(plan.markers.is_empty());
    assert!(plan.list.is_empty());
}

#[test]
fn empty_store_list_renders_full_map() {
    let plan = render_pass(
        &StoreList::default(),
        &Catalog::default(),
        user(),
        &baltimore_viewport(12.0),
        &RenderOptions::default(),
    );
    assert_eq!(plan.layout, Layout::FullMap);
    assert_eq!(plan.hidden_reason, Some(HiddenReason::NoStoresInView));
}

#[test]
fn list_is_capped_but_markers_are_not() {
    let records: Vec<_> = (0..50)
        .map(|i| {
            json!({
                "name": format!("store-{i}"),
                "latitude": 39.05 + f64::from(i) * 0.01,
                "longitude": -76.5
            })
        })
        .collect();
    let stores = StoreList::from_value(&serde_json::Value::Array(records));
    let plan = render_pass(
        &stores,
        &Catalog::default(),
        user(),
        &baltimore_viewport(9.0),
        &RenderOptions::default(),
    );
    assert_eq!(plan.markers.len(), 50);
    assert_eq!(plan.list.len(), 10);
}

#[test]
fn options_override_limits() {
    let options = RenderOptions {
        min_zoom: 11.0,
        nearest_limit: 1,
    };
    let hidden = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(10.0),
        &options,
    );
    assert!(hidden.is_hidden());

    let shown = render_pass(
        &three_store_list(),
        &catalog(),
        user(),
        &baltimore_viewport(11.0),
        &options,
    );
    assert_eq!(shown.list.len(), 1);
    assert_eq!(shown.markers.len(), 3);
}

#[test]
fn format_distance_uses_one_decimal() {
    assert_eq!(format_distance(0.0), "0.0 mi");
    assert_eq!(format_distance(2.04), "2.0 mi");
    assert_eq!(format_distance(12.36), "12.4 mi");
}

#[test]
fn format_distance_rounds_exact_halves_up() {
    assert_eq!(format_distance(0.25), "0.3 mi");
    assert_eq!(format_distance(2.25), "2.3 mi");
    assert_eq!(format_distance(10.75), "10.8 mi");
}

#[test]
fn format_distance_keeps_inexact_near_halves_as_stored() {
    // 0.35 and 1.15 are stored just below the half.
    assert_eq!(format_distance(0.35), "0.3 mi");
    assert_eq!(format_distance(1.15), "1.1 mi");
}

#[test]
fn plan_serializes_layout_in_snake_case() {
    let value = serde_json::to_value(RenderPlan::hidden(HiddenReason::ZoomedOut)).unwrap();
    assert_eq!(value["layout"], "full_map");
    assert_eq!(value["hidden_reason"], "zoomed_out");
}
