#![allow(non_snake_case)]

use dioxus::prelude::*;
use stac_common::display;

use crate::state::CatalogState;

/// Metadata of the most recently selected item.
#[component]
pub fn DetailPane() -> Element {
    let state = use_context::<CatalogState>();
    let session = state.session.read();
    let items = state.items.read();

    if !*state.detail_open.read() {
        return rsx! {};
    }
    let item = session.item_query().and_then(|key| {
        let id = session.latest_item()?;
        items.data_for(&key)?.find(id).cloned()
    });
    let Some(item) = item else {
        return rsx! {};
    };

    let heading = display::detail_heading(&item);
    let rows = display::detail_rows(&item);
    let thumbnail = item.thumbnail().map(str::to_string);
    let visual = item.visual().map(str::to_string);
    let selected_count = session.selected_items().len();

    rsx! {
        aside { class: "detail-pane",
            div { class: "detail-header",
                h2 { class: "detail-title", "{heading}" }
                button {
                    class: "detail-close",
                    title: "Close and clear selection",
                    onclick: move |_| {
                        state.update_session(|session| session.clear_item_selection());
                    },
                    "\u{00d7}"
                }
            }

            if selected_count > 1 {
                p { class: "text-secondary", "{selected_count} items selected" }
            }

            if let Some(src) = thumbnail {
                img { class: "detail-thumb", src: "{src}", alt: "{heading}" }
            }

            table { class: "detail-table",
                tbody {
                    for (label, value) in rows {
                        tr { key: "{label}",
                            th { "{label}" }
                            td { "{value}" }
                        }
                    }
                }
            }

            if let Some(href) = visual {
                a {
                    class: "detail-link",
                    href: "{href}",
                    target: "_blank",
                    "Download visual asset"
                }
            }
        }
    }
}
