//! In-process worksheet store

use crate::error::{SheetsError, SheetsResult};
use crate::store::SheetStore;

/// A spreadsheet held entirely in memory.
///
/// Behaves like the remote store for every [`SheetStore`] call, which makes
/// it the store of choice for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    worksheets: Vec<(String, Vec<Vec<String>>)>,
    read_only: bool,
}

impl MemoryStore {
    /// Create a store with no worksheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a worksheet with initial contents (builder style)
    pub fn with_worksheet<S: Into<String>>(mut self, title: S, rows: Vec<Vec<String>>) -> Self {
        self.worksheets.push((title.into(), rows));
        self
    }

    /// Reject every write from now on
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Contents of a worksheet
    pub fn worksheet(&self, title: &str) -> Option<&[Vec<String>]> {
        self.worksheets
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, rows)| rows.as_slice())
    }

    fn rows_mut(&mut self, title: &str) -> SheetsResult<&mut Vec<Vec<String>>> {
        if self.read_only {
            return Err(SheetsError::WriteRejected(format!("worksheet '{title}' is read-only")));
        }
        self.worksheets
            .iter_mut()
            .find(|(t, _)| t == title)
            .map(|(_, rows)| rows)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_string()))
    }
}

impl SheetStore for MemoryStore {
    fn worksheet_titles(&mut self) -> SheetsResult<Vec<String>> {
        Ok(self.worksheets.iter().map(|(t, _)| t.clone()).collect())
    }

    fn read_values(&mut self, title: &str) -> SheetsResult<Vec<Vec<String>>> {
        self.worksheet(title)
            .map(<[Vec<String>]>::to_vec)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_string()))
    }

    fn append_row(&mut self, title: &str, row: &[String]) -> SheetsResult<()> {
        let rows = self.rows_mut(title)?;
        while rows.last().map(|r| r.iter().all(String::is_empty)).unwrap_or(false) {
            rows.pop();
        }
        rows.push(row.to_vec());
        Ok(())
    }

    fn update_row(&mut self, title: &str, row_number: usize, row: &[String]) -> SheetsResult<()> {
        if row_number == 0 {
            return Err(SheetsError::other("sheet rows are numbered from 1"));
        }
        let rows = self.rows_mut(title)?;
        if rows.len() < row_number {
            rows.resize(row_number, Vec::new());
        }
        let target = &mut rows[row_number - 1];
        if target.len() < row.len() {
            target.resize(row.len(), String::new());
        }
        target[..row.len()].clone_from_slice(row);
        Ok(())
    }

    fn add_worksheet(&mut self, title: &str) -> SheetsResult<()> {
        if self.read_only {
            return Err(SheetsError::WriteRejected(format!("cannot add worksheet '{title}'")));
        }
        if self.worksheets.iter().any(|(t, _)| t == title) {
            return Err(SheetsError::DuplicateWorksheet(title.to_string()));
        }
        self.worksheets.push((title.to_string(), Vec::new()));
        Ok(())
    }

    fn delete_worksheet(&mut self, title: &str) -> SheetsResult<()> {
        if self.read_only {
            return Err(SheetsError::WriteRejected(format!("cannot delete worksheet '{title}'")));
        }
        let Some(pos) = self.worksheets.iter().position(|(t, _)| t == title) else {
            return Err(SheetsError::WorksheetNotFound(title.to_string()));
        };
        if self.worksheets.len() == 1 {
            return Err(SheetsError::WriteRejected(format!(
                "cannot remove '{title}', the only worksheet in the document"
            )));
        }
        self.worksheets.remove(pos);
        Ok(())
    }

    fn rename_worksheet(&mut self, from: &str, to: &str) -> SheetsResult<()> {
        if self.read_only {
            return Err(SheetsError::WriteRejected(format!("cannot rename worksheet '{from}'")));
        }
        if from != to && self.worksheets.iter().any(|(t, _)| t == to) {
            return Err(SheetsError::DuplicateWorksheet(to.to_string()));
        }
        let entry = self
            .worksheets
            .iter_mut()
            .find(|(t, _)| t == from)
            .ok_or_else(|| SheetsError::WorksheetNotFound(from.to_string()))?;
        entry.0 = to.to_string();
        Ok(())
    }

    fn write_values(&mut self, title: &str, values: &[Vec<String>]) -> SheetsResult<()> {
        let rows = self.rows_mut(title)?;
        for (i, row) in values.iter().enumerate() {
            if rows.len() <= i {
                rows.push(Vec::new());
            }
            let target = &mut rows[i];
            if target.len() < row.len() {
                target.resize(row.len(), String::new());
            }
            target[..row.len()].clone_from_slice(row);
        }
        Ok(())
    }
}
