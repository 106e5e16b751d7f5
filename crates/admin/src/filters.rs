//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, NaiveDate};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a backend timestamp as `01 Jun 2024`.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates; anything else is
/// shown unchanged.
///
/// Usage in templates: `{{ tip.date|short_date }}`
#[askama::filter_fn]
pub fn short_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_short_date(&value.to_string()))
}

pub(crate) fn format_short_date(raw: &str) -> String {
    const FORMAT: &str = "%d %b %Y";

    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return timestamp.format(FORMAT).to_string();
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map_or_else(|| raw.to_string(), |date| date.format(FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date_formats() {
        assert_eq!(format_short_date("2024-06-01T10:30:00.000Z"), "01 Jun 2024");
        assert_eq!(format_short_date("2024-06-01"), "01 Jun 2024");
        assert_eq!(format_short_date("yesterday"), "yesterday");
        assert_eq!(format_short_date(""), "");
    }
}
