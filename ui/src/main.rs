#![allow(non_snake_case)]

use dioxus::prelude::*;

mod api;
mod map;
mod state;
mod views;

use state::CatalogState;
use views::detail::DetailPane;
use views::map_view::MapView;
use views::sidebar::Sidebar;

fn main() {
    dioxus::logger::initialize_default();
    launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(CatalogState::new);
    api::use_catalog_fetches(state);

    let detail_open = *state.detail_open.read();
    let has_selection = state.session.read().latest_item().is_some();

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }

        div { class: "app-shell",
            // Header
            header { class: "app-header",
                h1 { class: "app-title", "Aerial Imagery Catalog" }

                div { class: "header-controls",
                    if has_selection {
                        button {
                            class: "detail-toggle-btn",
                            onclick: move |_| state.set_detail_open(!detail_open),
                            if detail_open { "Hide details" } else { "Show details" }
                        }
                    }
                }
            }

            div { class: "app-body",
                Sidebar {}
                DetailPane {}
                MapView {}
            }
        }
    }
}
