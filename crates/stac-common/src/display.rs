//! Per-field presentation of items, with the fallbacks used when a field is
//! missing. Nothing here fails: absent data renders as a placeholder.

use chrono::{DateTime, NaiveDate};

use crate::types::{Item, ItemCollection};

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_PRODUCER: &str = "Unknown producer";
pub const NO_DATE: &str = "No date";

/// Calendar date of an RFC 3339 timestamp, or of a bare `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc().date())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

/// `YYYY-MM-DD`, or `None` if the value does not parse.
pub fn format_date(value: &str) -> Option<String> {
    parse_date(value).map(|d| d.format("%Y-%m-%d").to_string())
}

pub fn item_title(item: &Item) -> String {
    item.properties
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Item {}", item.id))
}

/// Capture start date for item cards.
pub fn start_date(item: &Item) -> String {
    item.properties
        .start_datetime
        .as_deref()
        .and_then(format_date)
        .unwrap_or_else(|| NO_DATE.to_string())
}

/// Ground sample distance in whole centimeters.
pub fn resolution(item: &Item) -> String {
    match item.properties.gsd {
        Some(gsd) if gsd > 0.0 => format!("{} cm", (gsd * 100.0).round() as i64),
        _ => UNKNOWN.to_string(),
    }
}

pub fn producer(item: &Item) -> String {
    non_empty(item.properties.producer_name.as_deref()).unwrap_or_else(|| UNKNOWN_PRODUCER.into())
}

/// Heading of the detail pane: `"{id} - {date}"`, or just the id.
pub fn detail_heading(item: &Item) -> String {
    match item.properties.datetime.as_deref().and_then(format_date) {
        Some(date) => format!("{} - {}", item.id, date),
        None => item.id.clone(),
    }
}

/// Label/value rows for the detail pane.
pub fn detail_rows(item: &Item) -> Vec<(&'static str, String)> {
    let p = &item.properties;
    vec![
        (
            "Producer",
            non_empty(p.producer_name.as_deref()).unwrap_or_else(not_available),
        ),
        (
            "Created",
            p.created
                .as_deref()
                .and_then(format_date)
                .unwrap_or_else(not_available),
        ),
        (
            "GSD",
            p.gsd.map(|g| g.to_string()).unwrap_or_else(not_available),
        ),
        (
            "Providers",
            p.providers
                .as_ref()
                .filter(|ps| !ps.is_empty())
                .map(|ps| {
                    ps.iter()
                        .map(|pr| pr.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_else(not_available),
        ),
        (
            "Platform",
            non_empty(p.platform.as_deref()).unwrap_or_else(not_available),
        ),
        (
            "Instruments",
            p.instruments
                .as_ref()
                .filter(|i| !i.is_empty())
                .map(|i| i.join(","))
                .unwrap_or_else(not_available),
        ),
        (
            "License",
            non_empty(p.license.as_deref()).unwrap_or_else(not_available),
        ),
    ]
}

/// `"12 of 340 items"` when the server reports totals.
pub fn result_count(page: &ItemCollection) -> String {
    let returned = page
        .number_returned
        .unwrap_or(page.features.len() as u64);
    match page.number_matched {
        Some(matched) => format!("{} of {} item{}", returned, matched, plural(matched)),
        None => format!("{} item{}", returned, plural(returned)),
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}
