//! Lenient date parsing for birth dates
//!
//! Worksheet dates arrive in whatever shape the person typing them chose.
//! [`parse_date`] tries a fixed list of common layouts, month-first for
//! slash-separated numeric dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// Parse a date from free text, returning `None` when no layout matches
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

/// ISO form used for stored birth dates
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Long human form used for display ("January 05, 1990")
pub fn to_long(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
