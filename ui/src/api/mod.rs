pub mod catalog_api;

use dioxus::prelude::*;
use stac_common::fetch::Ticket;
use stac_common::query::ItemQuery;

use crate::state::CatalogState;

/// Keep the catalog queries pointed at the current session.
///
/// Collections load once. Items follow the session's item query and
/// queryables follow the selected collection; an unchanged key does not
/// refetch.
pub fn use_catalog_fetches(state: CatalogState) {
    use_effect(move || {
        let mut collections = state.collections;
        let ticket = collections.write().request(Some(()));
        if let Some(ticket) = ticket {
            spawn_collections(state, ticket);
        }
    });

    use_effect(move || {
        let key = state.session.read().item_query();
        let mut items = state.items;
        let ticket = items.write().request(key);
        if let Some(ticket) = ticket {
            spawn_items(state, ticket);
        }
    });

    use_effect(move || {
        let key = state
            .session
            .read()
            .selected_collection()
            .map(str::to_string);
        let mut queryables = state.queryables;
        let ticket = queryables.write().request(key);
        if let Some(ticket) = ticket {
            spawn_queryables(state, ticket);
        }
    });
}

pub fn retry_collections(mut state: CatalogState) {
    let ticket = state.collections.write().refetch();
    if let Some(ticket) = ticket {
        spawn_collections(state, ticket);
    }
}

pub fn retry_items(mut state: CatalogState) {
    let ticket = state.items.write().refetch();
    if let Some(ticket) = ticket {
        spawn_items(state, ticket);
    }
}

fn spawn_collections(mut state: CatalogState, ticket: Ticket<()>) {
    spawn(async move {
        let urls = state.urls.peek().clone();
        let result = catalog_api::fetch_collections(&urls).await;
        match &result {
            Ok(list) => tracing::info!("Loaded {} collections", list.collections.len()),
            Err(e) => tracing::error!("Failed to load collections: {}", e),
        }
        state.collections.write().complete(ticket, result);
    });
}

fn spawn_items(mut state: CatalogState, ticket: Ticket<ItemQuery>) {
    spawn(async move {
        let urls = state.urls.peek().clone();
        let result = catalog_api::fetch_items(&urls, &ticket.key).await;
        let collection = ticket.key.collection_id.clone();
        match &result {
            Ok(page) => tracing::info!(
                "Loaded {} items for {}",
                page.features.len(),
                collection
            ),
            Err(e) => tracing::error!("Failed to load items for {}: {}", collection, e),
        }
        state.items.write().complete(ticket, result);
    });
}

fn spawn_queryables(mut state: CatalogState, ticket: Ticket<String>) {
    spawn(async move {
        let urls = state.urls.peek().clone();
        let result = catalog_api::fetch_queryables(&urls, &ticket.key).await;
        if let Err(e) = &result {
            tracing::warn!("Failed to load queryables for {}: {}", ticket.key, e);
        }
        state.queryables.write().complete(ticket, result);
    });
}
