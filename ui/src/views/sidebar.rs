#![allow(non_snake_case)]

use dioxus::prelude::*;
use stac_common::fetch::FetchState;

use super::filters::Filters;
use super::item_list::ItemList;
use crate::state::CatalogState;

#[component]
pub fn Sidebar() -> Element {
    let state = use_context::<CatalogState>();
    let collections = state.collections.read();
    let selected = state
        .session
        .read()
        .selected_collection()
        .map(str::to_string);
    let wmts = selected
        .as_deref()
        .map(|id| state.urls.read().wmts_capabilities(id));

    rsx! {
        aside { class: "sidebar",
            section { class: "sidebar-section",
                h2 { "Collection" }

                {match collections.state() {
                    FetchState::Idle | FetchState::Loading => rsx! {
                        p { class: "text-secondary", "Loading collections..." }
                    },
                    FetchState::Failed(e) => rsx! {
                        div { class: "error-box",
                            p { "Failed to load STAC catalog" }
                            p { class: "error-detail", "{e}" }
                            button {
                                class: "retry-btn",
                                onclick: move |_| crate::api::retry_collections(state),
                                "Retry"
                            }
                        }
                    },
                    FetchState::Ready(list) => rsx! {
                        select {
                            class: "collection-select",
                            value: selected.clone().unwrap_or_default(),
                            onchange: move |e: Event<FormData>| {
                                let id = e.value();
                                if !id.is_empty() {
                                    state.update_session(|session| session.select_collection(id));
                                }
                            },
                            option { value: "", disabled: true, "Select a collection" }
                            for collection in list.collections.iter() {
                                option {
                                    key: "{collection.id}",
                                    value: "{collection.id}",
                                    selected: selected.as_deref() == Some(collection.id.as_str()),
                                    {collection.display_title()}
                                }
                            }
                        }
                        if list.collections.is_empty() {
                            p { class: "text-secondary", "The catalog has no collections." }
                        }
                    },
                }}

                if let Some(url) = wmts {
                    div { class: "wmts-link",
                        span { class: "wmts-label", "WMTS" }
                        input {
                            class: "wmts-url mono",
                            r#type: "text",
                            readonly: true,
                            value: "{url}",
                        }
                        button {
                            class: "copy-btn",
                            onclick: {
                                let url = url.clone();
                                move |_| copy_to_clipboard(&url)
                            },
                            "Copy"
                        }
                    }
                }
            }

            if selected.is_some() {
                Filters {}
                ItemList {}
            } else {
                p { class: "sidebar-hint text-secondary",
                    "Select a collection to browse its imagery."
                }
            }
        }
    }
}

fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.navigator().clipboard().write_text(text);
    }
}
