//! Nearest-store ranking.

use crate::geo::{haversine_miles, GeoPoint};
use crate::store::Store;
use crate::viewport::VisibleStore;

/// How many stores the list shows.
pub const NEAREST_STORE_LIMIT: usize = 10;

/// A visible store with its distance from the user. Lives for one pass.
#[derive(Debug, Clone, Copy)]
pub struct RankedStore<'a> {
    pub index: usize,
    pub store: &'a Store,
    pub position: GeoPoint,
    pub distance_miles: f64,
}

/// Rank `candidates` by distance from `origin`, nearest first, keeping at
/// most `limit`.
///
/// The sort is stable: equidistant stores keep their collection order.
#[must_use]
pub fn rank_nearest<'a>(
    origin: GeoPoint,
    candidates: &[VisibleStore<'a>],
    limit: usize,
) -> Vec<RankedStore<'a>> {
    let mut ranked: Vec<RankedStore<'a>> = candidates
        .iter()
        .map(|candidate| RankedStore {
            index: candidate.index,
            store: candidate.store,
            position: candidate.position,
            distance_miles: haversine_miles(origin, candidate.position),
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::StoreList;
    use crate::viewport::{filter_visible, Bounds, Viewport, MIN_ZOOM_TO_SHOW_MARKERS};

    const USER: GeoPoint = GeoPoint {
        lat: 39.4015,
        lng: -76.6053,
    };

    fn everything_visible(list: &StoreList) -> Vec<VisibleStore<'_>> {
        let viewport = Viewport {
            bounds: Bounds {
                south: -90.0,
                north: 90.0,
                west: -180.0,
                east: 180.0,
            },
            zoom: 12.0,
        };
        filter_visible(list, &viewport, MIN_ZOOM_TO_SHOW_MARKERS)
            .stores()
            .to_vec()
    }

    #[test]
    fn store_at_user_location_is_zero_miles() {
        let list = StoreList::from_value(&json!([
            {"name": "here", "latitude": 39.4015, "longitude": -76.6053}
        ]));
        let ranked = rank_nearest(USER, &everything_visible(&list), NEAREST_STORE_LIMIT);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].distance_miles.abs() < 1e-9);
    }

    #[test]
    fn nearest_first() {
        let list = StoreList::from_value(&json!([
            {"name": "far", "latitude": 39.60, "longitude": -76.6053},
            {"name": "near", "latitude": 39.41, "longitude": -76.6053},
            {"name": "mid", "latitude": 39.50, "longitude": -76.6053}
        ]));
        let ranked = rank_nearest(USER, &everything_visible(&list), NEAREST_STORE_LIMIT);
        let names: Vec<_> = ranked.iter().map(|r| r.store.display_name()).collect();
        assert_eq!(names, vec!["near", "mid", "far"]);
        assert!(ranked.windows(2).all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn equidistant_stores_keep_collection_order() {
        let list = StoreList::from_value(&json!([
            {"name": "a", "latitude": 39.5015, "longitude": -76.6053},
            {"name": "b", "latitude": 39.5015, "longitude": -76.6053},
            {"name": "c", "latitude": 39.5015, "longitude": -76.6053},
            {"name": "closest", "latitude": 39.4016, "longitude": -76.6053}
        ]));
        let ranked = rank_nearest(USER, &everything_visible(&list), NEAREST_STORE_LIMIT);
        let names: Vec<_> = ranked.iter().map(|r| r.store.display_name()).collect();
        assert_eq!(names, vec!["closest", "a", "b", "c"]);
    }

    #[test]
    fn output_never_exceeds_limit() {
        let records: Vec<_> = (0..50)
            .map(|i| {
                json!({
                    "name": format!("store-{i}"),
                    "latitude": 39.0 + f64::from(i) * 0.01,
                    "longitude": -76.6
                })
            })
            .collect();
        let list = StoreList::from_value(&serde_json::Value::Array(records));
        let candidates = everything_visible(&list);
        assert_eq!(candidates.len(), 50);

        let ranked = rank_nearest(USER, &candidates, NEAREST_STORE_LIMIT);
        assert_eq!(ranked.len(), NEAREST_STORE_LIMIT);
    }

    #[test]
    fn ranked_entries_keep_their_list_index() {
        let list = StoreList::from_value(&json!([
            {"name": "far", "latitude": 39.9, "longitude": -76.6053},
            {"name": "near", "latitude": 39.41, "longitude": -76.6053}
        ]));
        let ranked = rank_nearest(USER, &everything_visible(&list), NEAREST_STORE_LIMIT);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 0);
    }
}
