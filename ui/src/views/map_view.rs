#![allow(non_snake_case)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dioxus::prelude::*;
use stac_common::geo::BBox;
use stac_common::map::{settled_items, MapInputs, MapProjection, MapStyle, MarkerClick};
use stac_common::session::{Session, SubscriptionId};

use crate::map::{maplibre, MapLibreEngine, MAP_CONTAINER};
use crate::state::CatalogState;

type Projection = Rc<RefCell<Option<MapProjection<MapLibreEngine>>>>;

/// Map handles that live as long as the component.
#[derive(Clone, Default)]
struct MapSlot {
    map: Rc<RefCell<Option<maplibre::Map>>>,
    projection: Projection,
    subscription: Rc<Cell<Option<SubscriptionId>>>,
}

#[component]
pub fn MapView() -> Element {
    let state = use_context::<CatalogState>();
    let slot = use_hook(MapSlot::default);
    let ready = use_signal(|| false);

    // Create the map once the container is in the DOM.
    {
        let slot = slot.clone();
        use_effect(move || {
            if slot.map.borrow().is_some() {
                return;
            }
            let on_load = {
                let slot = slot.clone();
                move |map: maplibre::Map| {
                    install(state, &slot, map);
                    let mut ready = ready;
                    ready.set(true);
                }
            };
            match maplibre::mount(MAP_CONTAINER, on_load) {
                Ok(map) => *slot.map.borrow_mut() = Some(map),
                Err(e) => tracing::error!("Map setup failed: {:?}", e),
            }
        });
    }

    // Session changes arrive through the subscription; item pages through here.
    {
        let slot = slot.clone();
        use_effect(move || {
            let items = state.items.read();
            let session = state.session.peek();
            let Ok(mut projection) = slot.projection.try_borrow_mut() else {
                return;
            };
            if let Some(projection) = projection.as_mut() {
                let inputs = MapInputs::new(&session, settled_items(&session, &items));
                projection.apply_snapshot(&inputs);
            }
        });
    }

    {
        let slot = slot.clone();
        use_drop(move || {
            if let Some(id) = slot.subscription.take() {
                let mut session = state.session;
                if let Ok(mut session) = session.try_write() {
                    session.unsubscribe(id);
                };
            }
            // Dropping the projection removes its markers.
            slot.projection.borrow_mut().take();
            if let Some(map) = slot.map.borrow_mut().take() {
                maplibre::destroy(&map);
            }
        });
    }

    let bbox = state.session.read().bounding_box();
    let map_slot = slot.clone();

    rsx! {
        div { class: "map-panel",
            div { id: "{MAP_CONTAINER}", class: "map-container" }

            if *ready.read() {
                div { class: "map-controls",
                    button {
                        class: "map-btn",
                        title: "Limit items to the visible map area",
                        onclick: move |_| {
                            let Some(map) = map_slot.map.borrow().clone() else {
                                return;
                            };
                            let bbox = maplibre::visible_bounds(&map).clamped();
                            tracing::info!("Searching area {}", bbox.to_param());
                            state.update_session(|session| session.set_bounding_box(bbox));
                        },
                        "Search this area"
                    }
                    if !bbox.is_world() {
                        button {
                            class: "map-btn secondary",
                            onclick: move |_| {
                                state.update_session(|session| {
                                    session.set_bounding_box(BBox::WORLD)
                                });
                            },
                            "Reset"
                        }
                    }
                }
            }
        }
    }
}

/// Build the projection on the loaded map and subscribe it to the session.
fn install(state: CatalogState, slot: &MapSlot, map: maplibre::Map) {
    let on_click: MarkerClick = {
        let projection = slot.projection.clone();
        Rc::new(move |id: &str| {
            // Focus before selecting so the selection sync sees it as focused.
            if let Ok(mut projection) = projection.try_borrow_mut() {
                if let Some(projection) = projection.as_mut() {
                    projection.focus_item(id);
                }
            }
            state.update_session(|session| session.select_item(id));
            state.set_detail_open(true);
        })
    };

    let urls = state.urls.peek().clone();
    let mut projection = MapProjection::new(
        MapLibreEngine::new(map),
        urls,
        MapStyle::default(),
        on_click,
    );
    {
        let session = state.session.peek();
        let items = state.items.peek();
        projection.apply_snapshot(&MapInputs::new(&session, settled_items(&session, &items)));
    }
    *slot.projection.borrow_mut() = Some(projection);

    let listener_slot = slot.projection.clone();
    let items = state.items;
    let mut session = state.session;
    let id = session.write().subscribe(move |change, session: &Session| {
        tracing::debug!("Map sync after {:?} change", change);
        let Ok(mut projection) = listener_slot.try_borrow_mut() else {
            return;
        };
        if let Some(projection) = projection.as_mut() {
            let items = items.peek();
            let inputs = MapInputs::new(session, settled_items(session, &items));
            projection.apply_snapshot(&inputs);
        }
    });
    slot.subscription.set(Some(id));
    tracing::info!("Map ready");
}
