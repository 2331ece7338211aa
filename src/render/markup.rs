//! Small markup helpers shared by the detail panel and map popups.

use chrono::{DateTime, NaiveDate};

pub const NOT_SPECIFIED: &str = "not specified";
pub const INVALID_DATE: &str = "invalid date";

/// Escapes free text for an element body. The text displays verbatim.
pub fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

/// Escapes a value for a double-quoted attribute.
pub fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Escaped text, or "not specified" when absent.
pub fn text_or_unspecified(value: Option<&str>) -> String {
    value.map(text).unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Formats an analysis date as `dd/mm/yyyy`.
///
/// Accepts plain dates (`2025-06-15`) and RFC 3339 timestamps. Never fails:
/// absent dates read "not specified", unparseable ones "invalid date".
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim) else {
        return NOT_SPECIFIED.to_string();
    };

    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));

    match parsed {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// A measured value followed by its unit, if any.
pub fn quantity(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{}", value)
    } else {
        format!("{} {}", value, unit)
    }
}
