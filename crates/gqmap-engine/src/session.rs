//! Locator session: the state a render pass reads.
//!
//! Collections are held behind `Arc` and replaced wholesale; a pass works on
//! a [`SessionSnapshot`] so a reload that lands mid-pass cannot tear it.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::location::UserLocation;
use crate::render::{render_pass, RenderOptions, RenderPlan};
use crate::store::StoreList;
use crate::viewport::Viewport;

#[derive(Debug, Clone)]
pub struct LocatorSession {
    user: UserLocation,
    options: RenderOptions,
    catalog: Arc<Catalog>,
    stores: Arc<StoreList>,
    catalog_loaded: bool,
    stores_loaded: bool,
}

/// Immutable view of a session for the length of one pass.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub user: UserLocation,
    pub options: RenderOptions,
    pub catalog: Arc<Catalog>,
    pub stores: Arc<StoreList>,
}

impl LocatorSession {
    #[must_use]
    pub fn new(user: UserLocation, options: RenderOptions) -> Self {
        Self {
            user,
            options,
            catalog: Arc::new(Catalog::default()),
            stores: Arc::new(StoreList::default()),
            catalog_loaded: false,
            stores_loaded: false,
        }
    }

    /// Swap in a freshly loaded catalog. An empty catalog still counts as
    /// loaded: a failed fetch leaves the session in a degraded, empty state.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        tracing::debug!(products = catalog.len(), "catalog replaced");
        self.catalog = Arc::new(catalog);
        self.catalog_loaded = true;
    }

    /// Swap in a freshly loaded store list. See [`Self::replace_catalog`].
    pub fn replace_stores(&mut self, stores: StoreList) {
        tracing::debug!(
            stores = stores.len(),
            located = stores.located_count(),
            "store list replaced"
        );
        self.stores = Arc::new(stores);
        self.stores_loaded = true;
    }

    pub fn set_user_location(&mut self, user: UserLocation) {
        self.user = user;
    }

    /// Both collections have arrived at least once.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.catalog_loaded && self.stores_loaded
    }

    #[must_use]
    pub fn user(&self) -> UserLocation {
        self.user
    }

    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user,
            options: self.options,
            catalog: Arc::clone(&self.catalog),
            stores: Arc::clone(&self.stores),
        }
    }

    /// Render the current viewport, or `None` until both collections have
    /// loaded once.
    #[must_use]
    pub fn render(&self, viewport: &Viewport) -> Option<RenderPlan> {
        if !self.is_ready() {
            tracing::debug!("render skipped; data not loaded yet");
            return None;
        }
        Some(self.snapshot().render(viewport))
    }
}

impl SessionSnapshot {
    #[must_use]
    pub fn render(&self, viewport: &Viewport) -> RenderPlan {
        render_pass(
            &self.stores,
            &self.catalog,
            self.user.point,
            viewport,
            &self.options,
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::location::FALLBACK_LOCATION;
    use crate::render::Layout;
    use crate::viewport::Bounds;

    fn session() -> LocatorSession {
        LocatorSession::new(
            UserLocation::resolve(None, FALLBACK_LOCATION),
            RenderOptions::default(),
        )
    }

    fn viewport() -> Viewport {
        Viewport {
            bounds: Bounds {
                south: 39.0,
                north: 39.8,
                west: -77.0,
                east: -76.0,
            },
            zoom: 10.0,
        }
    }

    fn one_store() -> StoreList {
        StoreList::from_value(&json!([
            {"name": "Towson", "latitude": 39.4015, "longitude": -76.6053}
        ]))
    }

    #[test]
    fn render_waits_for_both_collections() {
        let mut session = session();
        assert!(session.render(&viewport()).is_none());

        session.replace_stores(one_store());
        assert!(!session.is_ready());
        assert!(session.render(&viewport()).is_none());

        session.replace_catalog(Catalog::default());
        assert!(session.is_ready());
        let plan = session.render(&viewport()).expect("ready");
        assert_eq!(plan.layout, Layout::Sidebar);
        assert_eq!(plan.list.len(), 1);
        assert!(plan.list[0].distance_miles.abs() < 1e-9);
    }

    #[test]
    fn failed_loads_still_unblock_rendering() {
        let mut session = session();
        session.replace_catalog(Catalog::default());
        session.replace_stores(StoreList::default());
        let plan = session.render(&viewport()).expect("ready");
        assert!(plan.is_hidden());
    }

    #[test]
    fn snapshot_is_unaffected_by_later_replacement() {
        let mut session = session();
        session.replace_catalog(Catalog::default());
        session.replace_stores(one_store());
        let snapshot = session.snapshot();

        session.replace_stores(StoreList::default());

        assert_eq!(snapshot.stores.len(), 1);
        assert_eq!(snapshot.render(&viewport()).markers.len(), 1);
        assert!(session.render(&viewport()).expect("ready").is_hidden());
    }

    #[test]
    fn user_location_can_move() {
        let mut session = session();
        let moved = UserLocation::resolve(
            crate::geo::GeoPoint::new(39.5, -76.6),
            FALLBACK_LOCATION,
        );
        session.set_user_location(moved);
        assert_eq!(session.user(), moved);
        assert_eq!(session.snapshot().user, moved);
    }
}
