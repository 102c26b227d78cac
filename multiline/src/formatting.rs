//! Axis and tooltip label formatting.
//!
//! Date formatting is permissive: anything that does not parse as a date is
//! returned unchanged, since category ticks are not always dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::surface::RenderSurface;

/// Suffix carried by custom field identifiers.
const CUSTOM_FIELD_SUFFIX: &str = "__c";

/// Naive date-time layouts accepted besides RFC 3339.
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date-like value. Values with an offset are normalized to UTC.
pub fn parse_date_like(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    // e.g. 2024-01-01T10:00:00.000+0000
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a date-like value as `MM/DD/YYYY`, or return it unchanged.
pub fn format_date(raw: &str) -> String {
    match parse_date_like(raw) {
        Some(dt) => dt.format("%m/%d/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// Format a date-like value as `MM/DD/YYYY h:mm AM`, or return it unchanged.
pub fn format_date_time(raw: &str) -> String {
    match parse_date_like(raw) {
        Some(dt) => dt.format("%m/%d/%Y %-I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// Turn a field identifier into a readable label.
///
/// `"Deal_Stage__c"` becomes `"Deal Stage"`; `None` becomes `""`.
pub fn humanize<'a>(identifier: impl Into<Option<&'a str>>) -> String {
    let Some(id) = identifier.into() else {
        return String::new();
    };
    let id = id.strip_suffix(CUSTOM_FIELD_SUFFIX).unwrap_or(id);

    id.split(['_', '-', '.', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Format a numeric value for display.
///
/// - Integer values display without decimal places
/// - Other values display with 2 decimal places
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Label for an x-axis tick.
///
/// The tick value is mapped back to its category label when the surface can
/// do so; otherwise the value's own string form is used.
pub fn tick_label<S: RenderSurface + ?Sized>(surface: &S, value: f64) -> String {
    let raw = surface
        .label_for_value(value)
        .unwrap_or_else(|| value.to_string());
    format_date(&raw)
}
