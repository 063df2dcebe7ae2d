use dioxus::prelude::*;
use stac_common::config::CatalogConfig;
use stac_common::fetch::QueryCell;
use stac_common::query::{CatalogUrls, ItemQuery};
use stac_common::session::Session;
use stac_common::types::{CollectionList, ItemCollection, Queryables};

/// Shared viewer state, provided once by the root component and read by
/// every panel through `use_context::<CatalogState>()`.
#[derive(Clone, Copy)]
pub struct CatalogState {
    /// Selected collection, selected items, filter and query bbox.
    pub session: Signal<Session>,
    pub collections: Signal<QueryCell<(), CollectionList>>,
    /// Item page, keyed by the query that produced it.
    pub items: Signal<QueryCell<ItemQuery, ItemCollection>>,
    pub queryables: Signal<QueryCell<String, Queryables>>,
    pub urls: Signal<CatalogUrls>,
    /// Whether the detail pane is shown for the latest selected item.
    pub detail_open: Signal<bool>,
}

impl CatalogState {
    pub fn new() -> Self {
        let config = CatalogConfig::from_build_env();
        tracing::info!(
            "Catalog at {} (tiles {}, limit {})",
            config.api_root(),
            config.raster_root(),
            config.items_limit
        );
        Self {
            session: Signal::new(Session::new()),
            collections: Signal::new(QueryCell::new()),
            items: Signal::new(QueryCell::new()),
            queryables: Signal::new(QueryCell::new()),
            urls: Signal::new(CatalogUrls::new(config)),
            detail_open: Signal::new(true),
        }
    }

    /// Mutate the session. Session listeners run inside `f`; components
    /// reading the session re-render afterwards.
    pub fn update_session(mut self, f: impl FnOnce(&mut Session)) {
        let mut session = self.session.write();
        f(&mut session);
    }

    pub fn set_detail_open(mut self, open: bool) {
        self.detail_open.set(open);
    }
}
