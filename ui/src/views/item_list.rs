#![allow(non_snake_case)]

use dioxus::prelude::*;
use stac_common::display;
use stac_common::fetch::FetchState;
use stac_common::types::Item;

use crate::state::CatalogState;

#[component]
pub fn ItemList() -> Element {
    let state = use_context::<CatalogState>();
    let items = state.items.read();
    let session = state.session.read();

    rsx! {
        section { class: "sidebar-section item-list",
            h2 { "Items" }

            {match items.state() {
                FetchState::Idle => rsx! {},
                FetchState::Loading => rsx! {
                    p { class: "text-secondary", "Loading items..." }
                },
                FetchState::Failed(e) => rsx! {
                    div { class: "error-box",
                        p { "Failed to load STAC items" }
                        p { class: "error-detail", "{e}" }
                        button {
                            class: "retry-btn",
                            onclick: move |_| crate::api::retry_items(state),
                            "Retry"
                        }
                    }
                },
                FetchState::Ready(page) => {
                    let count = display::result_count(page);
                    let next = page.next_link().map(|link| link.href.clone());
                    let paged = session.page().is_some();
                    rsx! {
                        p { class: "result-count text-secondary", "{count}" }
                        if page.features.is_empty() {
                            p { class: "empty-state", "No items match the current filters." }
                        }
                        ul { class: "item-cards",
                            for item in page.features.iter() {
                                ItemCard {
                                    key: "{item.id}",
                                    item: item.clone(),
                                    selected: session.is_selected(&item.id),
                                }
                            }
                        }
                        if paged || next.is_some() {
                            div { class: "pager",
                                if paged {
                                    button {
                                        class: "pager-btn secondary",
                                        onclick: move |_| {
                                            state.update_session(|session| session.first_page());
                                        },
                                        "First page"
                                    }
                                }
                                if let Some(href) = next {
                                    button {
                                        class: "pager-btn",
                                        onclick: move |_| {
                                            let href = href.clone();
                                            state.update_session(|session| session.next_page(href));
                                        },
                                        "Next page"
                                    }
                                }
                            }
                        }
                    }
                }
            }}
        }
    }
}

#[component]
fn ItemCard(item: Item, selected: bool) -> Element {
    let state = use_context::<CatalogState>();

    let title = display::item_title(&item);
    let date = display::start_date(&item);
    let resolution = display::resolution(&item);
    let producer = display::producer(&item);
    let thumbnail = item.thumbnail().map(str::to_string);
    let card_class = if selected {
        "item-card selected"
    } else {
        "item-card"
    };
    let id = item.id.clone();

    rsx! {
        li {
            class: "{card_class}",
            onclick: move |e: MouseEvent| {
                let modifiers = e.modifiers();
                let id = id.clone();
                if modifiers.shift() || modifiers.ctrl() || modifiers.meta() {
                    state.update_session(|session| session.toggle_item_selection(&id));
                } else {
                    state.update_session(|session| session.select_item(id));
                    state.set_detail_open(true);
                }
            },

            if let Some(src) = thumbnail {
                img { class: "item-thumb", src: "{src}", alt: "{title}" }
            }
            div { class: "item-card-body",
                h3 { class: "item-card-title", "{title}" }
                div { class: "item-card-meta",
                    span { class: "stat", title: "Capture date", "{date}" }
                    span { class: "stat", title: "Resolution", "{resolution}" }
                }
                span { class: "item-card-producer text-secondary", "{producer}" }
            }
        }
    }
}
