//! Raw and reconciled client tables

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::field::{field_names, SORTABLE_FIELDS};
use crate::record::ClientRecord;
use crate::score::completeness;

/// A grid as read from a worksheet or CSV file: one header row plus data rows
///
/// Rows are normalised to the header width on construction: short rows are
/// padded with empty strings and long rows truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from a header row and data rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Split a full value grid into header (first row) and data rows
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let headers = grid.remove(0);
        Self::new(headers, grid)
    }

    /// Column names
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact name; the first occurrence wins
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// An ordered collection of client records sharing the fixed schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientTable {
    records: Vec<ClientRecord>,
}

impl ClientTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from records
    pub fn from_records(records: Vec<ClientRecord>) -> Self {
        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by position
    pub fn get(&self, index: usize) -> Option<&ClientRecord> {
        self.records.get(index)
    }

    /// Get a mutable record by position
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ClientRecord> {
        self.records.get_mut(index)
    }

    /// All records
    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    /// All records, mutably
    pub fn records_mut(&mut self) -> &mut [ClientRecord] {
        &mut self.records
    }

    /// Iterate records
    pub fn iter(&self) -> std::slice::Iter<'_, ClientRecord> {
        self.records.iter()
    }

    /// Append a record
    pub fn push(&mut self, record: ClientRecord) {
        self.records.push(record);
    }

    /// Remove the record at `index`
    pub fn remove(&mut self, index: usize) -> Result<ClientRecord> {
        if index >= self.records.len() {
            return Err(Error::RecordOutOfBounds(index, self.records.len()));
        }
        Ok(self.records.remove(index))
    }

    /// Header row in canonical order
    pub fn headers() -> Vec<String> {
        field_names().map(str::to_string).collect()
    }

    /// Records as value rows in canonical order
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(|r| r.values().to_vec()).collect()
    }

    /// Drop records whose fields are all blank
    pub fn drop_blank_rows(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.is_blank());
        before - self.records.len()
    }

    /// Positions of records containing `term` in any field, case-insensitively.
    ///
    /// An empty or whitespace-only term matches every record.
    pub fn search(&self, term: &str) -> Vec<usize> {
        let needle = term.trim().to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                needle.is_empty()
                    || record
                        .values()
                        .iter()
                        .any(|v| v.to_lowercase().contains(&needle))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Order the given positions by a sortable field (stable, case-insensitive, blanks last)
    pub fn sort_indices(&self, indices: &mut [usize], field: &str) -> Result<()> {
        if !SORTABLE_FIELDS.contains(&field) {
            return Err(Error::UnsortableField(field.to_string()));
        }
        indices.sort_by(|&a, &b| {
            let va = self.records[a].value(field).trim().to_lowercase();
            let vb = self.records[b].value(field).trim().to_lowercase();
            match (va.is_empty(), vb.is_empty()) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => va.cmp(&vb),
            }
        });
        Ok(())
    }

    /// Append records from `other` that are not already present.
    ///
    /// Two records are duplicates when every field is equal. Returns the
    /// number of records added.
    pub fn merge_dedup(&mut self, other: ClientTable) -> usize {
        let mut seen: HashSet<ClientRecord> = self.records.iter().cloned().collect();
        let mut added = 0;
        for record in other.records {
            if seen.insert(record.clone()) {
                self.records.push(record);
                added += 1;
            }
        }
        added
    }

    /// Mean completeness over all records, 0 for an empty table
    pub fn average_completeness(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: f64 = self.records.iter().map(completeness).sum();
        total / self.records.len() as f64
    }
}

impl IntoIterator for ClientTable {
    type Item = ClientRecord;
    type IntoIter = std::vec::IntoIter<ClientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClientTable {
    type Item = &'a ClientRecord;
    type IntoIter = std::slice::Iter<'a, ClientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<ClientRecord> for ClientTable {
    fn from_iter<I: IntoIterator<Item = ClientRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
