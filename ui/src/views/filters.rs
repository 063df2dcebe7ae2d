#![allow(non_snake_case)]

use chrono::{Local, NaiveDate};
use dioxus::prelude::*;
use stac_common::filter::{DateFilter, DatePreset};

use crate::state::CatalogState;

#[component]
pub fn Filters() -> Element {
    let state = use_context::<CatalogState>();
    let mut preset = use_signal(|| DatePreset::All);
    let filter = state.session.read().filter().clone();
    let queryables = state.queryables.read();

    let item_id = filter.item_id.item_id.clone().unwrap_or_default();
    let start = date_value(filter.dates.start_date);
    let end = date_value(filter.dates.end_date);
    let preset_value = preset.read().value();
    let queryable_names = queryables
        .state()
        .data()
        .map(|q| q.names().join(", "))
        .filter(|names| !names.is_empty());

    rsx! {
        section { class: "sidebar-section filters",
            h2 { "Filters" }

            label { class: "filter-label", "Item ID" }
            input {
                class: "filter-input",
                r#type: "text",
                placeholder: "Filter by item id...",
                value: "{item_id}",
                oninput: {
                    let filter = filter.clone();
                    move |e: Event<FormData>| {
                        let next = filter.with_item_id(e.value());
                        state.update_session(|session| session.set_filter(next));
                    }
                },
            }

            label { class: "filter-label", "Date range" }
            select {
                class: "filter-input",
                value: "{preset_value}",
                onchange: {
                    let filter = filter.clone();
                    move |e: Event<FormData>| {
                        let chosen = DatePreset::from_value(&e.value());
                        preset.set(chosen);
                        let today = Local::now().date_naive();
                        let next = filter.with_dates(chosen.range(today));
                        state.update_session(|session| session.set_filter(next));
                    }
                },
                for p in DatePreset::ALL {
                    option { value: p.value(), {p.label()} }
                }
            }

            div { class: "date-row",
                input {
                    class: "filter-input",
                    r#type: "date",
                    value: "{start}",
                    oninput: {
                        let filter = filter.clone();
                        move |e: Event<FormData>| {
                            let next = filter.with_start(DateFilter::parse_bound(&e.value()));
                            preset.set(DatePreset::All);
                            state.update_session(|session| session.set_filter(next));
                        }
                    },
                }
                span { class: "date-sep", "to" }
                input {
                    class: "filter-input",
                    r#type: "date",
                    value: "{end}",
                    oninput: {
                        let filter = filter.clone();
                        move |e: Event<FormData>| {
                            let next = filter.with_end(DateFilter::parse_bound(&e.value()));
                            preset.set(DatePreset::All);
                            state.update_session(|session| session.set_filter(next));
                        }
                    },
                }
            }

            if filter.dates.range().is_none()
                && (filter.dates.start_date.is_some() || filter.dates.end_date.is_some())
            {
                p { class: "text-secondary filter-hint", "Set both dates to filter by date." }
            }

            if let Some(names) = queryable_names {
                p {
                    class: "text-secondary queryables",
                    title: "Filterable properties",
                    "Queryables: {names}"
                }
            }
        }
    }
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
