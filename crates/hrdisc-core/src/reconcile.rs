//! Aligning arbitrary tables to the fixed client schema

use crate::field::FIELDS;
use crate::record::ClientRecord;
use crate::table::{ClientTable, RawTable};

/// What reconciliation had to change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Schema fields absent from the input, filled with empty values
    pub missing: Vec<&'static str>,
    /// Input columns outside the schema, discarded
    pub extra: Vec<String>,
}

impl ReconcileReport {
    /// Whether the input already matched the schema
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Project a raw table onto the fixed field list in canonical order.
///
/// Missing fields become empty strings in every row; extra columns are
/// dropped. Header names are matched after trimming. There is no error
/// case: absent data is simply empty.
pub fn reconcile(raw: &RawTable) -> (ClientTable, ReconcileReport) {
    let mut report = ReconcileReport::default();

    let mapping: Vec<Option<usize>> = FIELDS
        .iter()
        .map(|spec| {
            let column = raw.column_index(spec.name);
            if column.is_none() {
                report.missing.push(spec.name);
            }
            column
        })
        .collect();

    for header in raw.headers() {
        let name = header.trim();
        if !FIELDS.iter().any(|f| f.name == name) && !report.extra.iter().any(|e| e == name) {
            report.extra.push(name.to_string());
        }
    }

    if !report.missing.is_empty() {
        tracing::debug!("Missing columns added as empty: {}", report.missing.join(", "));
    }
    if !report.extra.is_empty() {
        tracing::debug!("Extra columns discarded: {}", report.extra.join(", "));
    }

    let table = raw
        .rows()
        .iter()
        .map(|row| {
            ClientRecord::from_values(
                mapping
                    .iter()
                    .map(|col| col.and_then(|c| row.get(c)).cloned().unwrap_or_default()),
            )
        })
        .collect();

    (table, report)
}
