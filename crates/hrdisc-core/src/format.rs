//! Display formatting of individual field values

use std::fmt;

use crate::date::{parse_date, to_long};
use crate::error::{Error, Result};
use crate::field::{field_spec, is_blank, title_case, FieldKind};

/// Placeholder text for blank values
pub const NOT_PROVIDED: &str = "Not provided";

/// Placeholder text when formatting fails
pub const DISPLAY_ERROR: &str = "Error displaying value";

/// Display knobs
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Narrative values longer than this many characters are truncated
    pub truncate_threshold: usize,
    /// Characters kept in the truncated summary (before the ellipsis)
    pub summary_len: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            truncate_threshold: 50,
            summary_len: 100,
        }
    }
}

/// A formatted field value, ready for a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    /// Blank or sentinel value
    NotProvided,
    /// Clickable mail-to reference
    MailTo(String),
    /// Clickable telephone reference
    Tel(String),
    /// Long human date
    Date(String),
    /// Narrative summary with the full text behind an "expand" affordance
    Truncated {
        /// Shortened text shown inline
        summary: String,
        /// Untruncated value
        full: String,
    },
    /// Plain text
    Text(String),
    /// Formatting failed
    Error,
}

impl DisplayValue {
    /// Link target for clickable values
    pub fn href(&self) -> Option<String> {
        match self {
            DisplayValue::MailTo(addr) => Some(format!("mailto:{addr}")),
            DisplayValue::Tel(number) => Some(format!("tel:{number}")),
            _ => None,
        }
    }

    /// Untruncated text, when this value has an expand affordance
    pub fn expanded(&self) -> Option<&str> {
        match self {
            DisplayValue::Truncated { full, .. } => Some(full),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::NotProvided => write!(f, "({NOT_PROVIDED})"),
            DisplayValue::MailTo(addr) => write!(f, "{addr} <mailto:{addr}>"),
            DisplayValue::Tel(number) => write!(f, "{number} <tel:{number}>"),
            DisplayValue::Date(text) | DisplayValue::Text(text) => f.write_str(text),
            DisplayValue::Truncated { summary, .. } => f.write_str(summary),
            DisplayValue::Error => write!(f, "({DISPLAY_ERROR})"),
        }
    }
}

/// Cut `text` to `max_chars` characters and append an ellipsis if anything was cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Format a value for display; never fails.
///
/// Any internal failure turns into [`DisplayValue::Error`].
pub fn format_field_value(value: &str, field: &str, options: &FormatOptions) -> DisplayValue {
    match try_format(value, field, options) {
        Ok(display) => display,
        Err(err) => {
            tracing::debug!("cannot display {field}: {err}");
            DisplayValue::Error
        }
    }
}

fn try_format(value: &str, field: &str, options: &FormatOptions) -> Result<DisplayValue> {
    let spec = field_spec(field).ok_or_else(|| Error::UnknownField(field.to_string()))?;
    let text = value.trim();

    if is_blank(text) {
        return Ok(DisplayValue::NotProvided);
    }

    let display = match spec.kind {
        FieldKind::Narrative if text.chars().count() > options.truncate_threshold => DisplayValue::Truncated {
            summary: truncate(text, options.summary_len),
            full: text.to_string(),
        },
        FieldKind::Email if text.contains('@') => DisplayValue::MailTo(text.to_string()),
        FieldKind::Phone if text.chars().count() >= 7 => DisplayValue::Tel(text.to_string()),
        FieldKind::BirthDate => match parse_date(text) {
            Some(date) => DisplayValue::Date(to_long(date)),
            None => DisplayValue::Text(text.to_string()),
        },
        FieldKind::Address => DisplayValue::Text(title_case(text)),
        _ => DisplayValue::Text(text.to_string()),
    };

    Ok(display)
}
