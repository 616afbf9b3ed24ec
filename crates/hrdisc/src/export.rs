//! JSON export, export file names and table statistics

use chrono::NaiveDateTime;
use hrdisc_core::{is_valid_email, ClientRecord, ClientTable};

use crate::error::Result;

/// File stem of whole-table exports
pub const TABLE_EXPORT_STEM: &str = "hrdisccrm_clients";

/// Records as a pretty-printed JSON array of objects in canonical field order.
///
/// Values are written in full; display truncation never applies here.
pub fn to_json(records: &[ClientRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// `{stem}_{YYYYMMDD_HHMMSS}.{ext}`, spaces in the stem replaced by underscores
pub fn export_file_name(stem: &str, ext: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        stem.trim().replace(' ', "_"),
        timestamp.format("%Y%m%d_%H%M%S"),
        ext
    )
}

/// `{Full_Name}_profile.{ext}` for a single-client export
pub fn profile_file_name(record: &ClientRecord, ext: &str) -> String {
    let name = record.full_name();
    let name = if name.is_empty() { "client".to_string() } else { name };
    format!("{}_profile.{}", name.replace(' ', "_"), ext)
}

/// Dashboard figures for a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStats {
    /// Number of records
    pub total: usize,
    /// Records whose email matches the address pattern
    pub valid_emails: usize,
    /// Mean completeness percentage
    pub average_completeness: f64,
}

impl TableStats {
    /// Compute the figures for `table`
    pub fn from_table(table: &ClientTable) -> Self {
        Self {
            total: table.len(),
            valid_emails: table.iter().filter(|r| is_valid_email(r.value("email"))).count(),
            average_completeness: table.average_completeness(),
        }
    }
}
