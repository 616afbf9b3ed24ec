//! Per-column cleaning of client records
//!
//! Each designated column has its own cleaner returning
//! `Result<String, CleanError>`. The pipeline applies them independently:
//! a column that fails keeps its original value and cleaning carries on
//! with the next column and the next row.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::date::{parse_date, to_iso};
use crate::field::{is_blank, title_case, FieldKind, FIELDS};
use crate::record::ClientRecord;
use crate::table::ClientTable;

/// Pattern an email must match after lower-casing and trimming
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(EMAIL_PATTERN).ok());

/// Why a single column could not be cleaned
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CleanError {
    /// Birth date did not match any known layout
    #[error("unparseable date: {0:?}")]
    UnparseableDate(String),

    /// Email pattern failed to compile
    #[error("email pattern unavailable")]
    PatternUnavailable,
}

/// Cleaning knobs
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Phones shorter than this (in characters, after trimming) are cleared
    pub min_phone_len: usize,
    /// Rewrite parseable birth dates as `YYYY-MM-DD`
    pub normalize_birth_date: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            min_phone_len: 7,
            normalize_birth_date: true,
        }
    }
}

/// One column that kept its original value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFailure {
    /// Record position within the table (0 for single records)
    pub row: usize,
    /// Field name
    pub field: &'static str,
    /// What went wrong
    pub error: CleanError,
}

/// Outcome counts of a cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Values replaced by the empty string (invalid or sentinel)
    pub cleared: usize,
    /// Columns left unmodified because their cleaner failed
    pub failures: Vec<ColumnFailure>,
}

impl CleanReport {
    fn absorb(&mut self, other: CleanReport) {
        self.cleared += other.cleared;
        self.failures.extend(other.failures);
    }
}

/// Check an email against [`EMAIL_PATTERN`] without modifying it
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().map(|re| re.is_match(email)).unwrap_or(false)
}

/// Lower-case and trim; invalid addresses become empty
pub fn clean_email(value: &str) -> Result<String, CleanError> {
    let re = EMAIL_RE.as_ref().ok_or(CleanError::PatternUnavailable)?;
    let email = value.trim().to_lowercase();
    if re.is_match(&email) {
        Ok(email)
    } else {
        Ok(String::new())
    }
}

/// Trim; values shorter than `min_len` characters become empty
pub fn clean_phone(value: &str, min_len: usize) -> Result<String, CleanError> {
    let phone = value.trim();
    if phone.chars().count() < min_len {
        Ok(String::new())
    } else {
        Ok(phone.to_string())
    }
}

/// Trim and title-case; sentinel values become empty
pub fn clean_name(value: &str) -> Result<String, CleanError> {
    let name = title_case(value.trim());
    if is_blank(&name) {
        Ok(String::new())
    } else {
        Ok(name)
    }
}

/// Trim only; sentinel values become empty. Length is never touched.
pub fn clean_narrative(value: &str) -> Result<String, CleanError> {
    if is_blank(value) {
        Ok(String::new())
    } else {
        Ok(value.trim().to_string())
    }
}

/// Parse and normalise to ISO; blank stays blank, garbage is an error
pub fn clean_birth_date(value: &str) -> Result<String, CleanError> {
    if is_blank(value) {
        return Ok(String::new());
    }
    parse_date(value)
        .map(to_iso)
        .ok_or_else(|| CleanError::UnparseableDate(value.to_string()))
}

fn clean_value(kind: FieldKind, value: &str, options: &CleanOptions) -> Option<Result<String, CleanError>> {
    match kind {
        FieldKind::Email => Some(clean_email(value)),
        FieldKind::Phone => Some(clean_phone(value, options.min_phone_len)),
        FieldKind::Name => Some(clean_name(value)),
        FieldKind::Narrative => Some(clean_narrative(value)),
        FieldKind::BirthDate if options.normalize_birth_date => Some(clean_birth_date(value)),
        FieldKind::BirthDate | FieldKind::Address | FieldKind::Plain => None,
    }
}

/// Clean every designated column of a record in place
pub fn clean_record(record: &mut ClientRecord, options: &CleanOptions) -> CleanReport {
    clean_record_at(record, 0, options)
}

fn clean_record_at(record: &mut ClientRecord, row: usize, options: &CleanOptions) -> CleanReport {
    let mut report = CleanReport::default();

    for (idx, spec) in FIELDS.iter().enumerate() {
        let slot = record.value_at_mut(idx);
        match clean_value(spec.kind, slot, options) {
            None => {}
            Some(Ok(cleaned)) => {
                if cleaned.is_empty() && !slot.is_empty() {
                    report.cleared += 1;
                }
                *slot = cleaned;
            }
            Some(Err(error)) => {
                tracing::debug!(row, field = spec.name, "cleaning skipped: {error}");
                report.failures.push(ColumnFailure {
                    row,
                    field: spec.name,
                    error,
                });
            }
        }
    }

    report
}

/// Clean every record of a table in place
pub fn clean_table(table: &mut ClientTable, options: &CleanOptions) -> CleanReport {
    let mut report = CleanReport::default();
    for (row, record) in table.records_mut().iter_mut().enumerate() {
        report.absorb(clean_record_at(record, row, options));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field_names;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_clean_email() {
        assert_eq!(clean_email("  A.B@Example.COM ").unwrap(), "a.b@example.com");
        assert_eq!(clean_email("not-an-email").unwrap(), "");
        assert_eq!(clean_email("nan").unwrap(), "");
        assert_eq!(clean_email("x@y.c").unwrap(), "");
    }

    #[test]
    fn test_clean_phone() {
        assert_eq!(clean_phone("12345", 7).unwrap(), "");
        assert_eq!(clean_phone("+1 555-123-4567", 7).unwrap(), "+1 555-123-4567");
        assert_eq!(clean_phone("  5551234  ", 7).unwrap(), "5551234");
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  jOHN  ").unwrap(), "John");
        assert_eq!(clean_name("mary ann").unwrap(), "Mary Ann");
        assert_eq!(clean_name("ßimon").unwrap(), "Ssimon");
        assert_eq!(clean_name("Ssimon").unwrap(), "Ssimon");
        for sentinel in ["nan", "None", "NULL", "   "] {
            assert_eq!(clean_name(sentinel).unwrap(), "", "{sentinel:?}");
        }
    }

    #[test]
    fn test_clean_narrative_keeps_long_text() {
        let text = format!("  {}\n\nSecond paragraph.  ", "D".repeat(500));
        let cleaned = clean_narrative(&text).unwrap();
        assert_eq!(cleaned.len(), 500 + "\n\nSecond paragraph.".len());
        assert_eq!(clean_narrative("nan").unwrap(), "");
    }

    #[test]
    fn test_birth_date_failure_is_isolated() {
        let mut record = ClientRecord::from_pairs([
            ("date_of_birth", "someday"),
            ("email", " ADA@EXAMPLE.COM"),
            ("first_name", "ada"),
        ]);
        let report = clean_record(&mut record, &CleanOptions::default());

        assert_eq!(record.value("date_of_birth"), "someday");
        assert_eq!(record.value("email"), "ada@example.com");
        assert_eq!(record.value("first_name"), "Ada");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].field, "date_of_birth");
    }

    #[test]
    fn test_birth_date_normalised() {
        let mut record = ClientRecord::from_pairs([("date_of_birth", "January 5, 1990")]);
        clean_record(&mut record, &CleanOptions::default());
        assert_eq!(record.value("date_of_birth"), "1990-01-05");
    }

    #[test]
    fn test_clean_table_reports_rows() {
        let mut table = ClientTable::from_records(vec![
            ClientRecord::from_pairs([("phone", "123")]),
            ClientRecord::from_pairs([("date_of_birth", "bad")]),
        ]);
        let report = clean_table(&mut table, &CleanOptions::default());
        assert_eq!(report.cleared, 1);
        assert_eq!(report.failures[0].row, 1);
    }

    fn arb_record() -> impl Strategy<Value = ClientRecord> {
        let value = prop_oneof![
            Just(String::new()),
            Just("nan".to_string()),
            Just(" A.B@Example.COM ".to_string()),
            Just("1990-01-05".to_string()),
            Just("01/05/1990".to_string()),
            Just("ßimon o'brien".to_string()),
            Just("élodie İnce".to_string()),
            "[ a-zA-Z0-9@.'-]{0,20}",
            "[ a-zßéøİ'-]{0,12}",
        ];
        proptest::collection::vec(value, field_names().count()).prop_map(ClientRecord::from_values)
    }

    proptest! {
        #[test]
        fn prop_cleaning_is_idempotent(record in arb_record()) {
            let options = CleanOptions::default();
            let mut once = record.clone();
            clean_record(&mut once, &options);
            let mut twice = once.clone();
            clean_record(&mut twice, &options);
            prop_assert_eq!(once, twice);
        }
    }
}
