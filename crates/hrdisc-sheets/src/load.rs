//! Reading the client worksheet into a cleaned table

use std::fmt;

use hrdisc_core::{clean_table, reconcile, CleanOptions, CleanReport, ClientTable, RawTable, ReconcileReport};

use crate::resolve::{resolve_worksheet, Resolution, FALLBACK_WORKSHEETS};
use crate::store::SheetStore;

/// Options for [`load_clients`]
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Worksheet to read when present
    pub preferred: String,
    /// Titles tried when the preferred worksheet is absent
    pub fallbacks: Vec<String>,
    /// Cleaning applied after reconciliation
    pub clean: CleanOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            preferred: "Clients".to_string(),
            fallbacks: FALLBACK_WORKSHEETS.iter().map(|s| s.to_string()).collect(),
            clean: CleanOptions::default(),
        }
    }
}

/// How a load went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Rows were read
    Success,
    /// No store is configured
    NotConnected,
    /// The document has no worksheets
    NoWorksheets,
    /// The worksheet has no cells at all
    Empty,
    /// The worksheet has a header but no data rows
    HeaderOnly,
    /// Listing worksheets failed
    ListFailed(String),
    /// Reading the worksheet failed
    ReadFailed(String),
}

impl LoadStatus {
    /// Whether rows were read
    pub fn is_success(&self) -> bool {
        matches!(self, LoadStatus::Success)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Success => write!(f, "Success"),
            LoadStatus::NotConnected => write!(f, "No authentication"),
            LoadStatus::NoWorksheets => write!(f, "No worksheets found"),
            LoadStatus::Empty => write!(f, "Sheet is empty"),
            LoadStatus::HeaderOnly => write!(f, "No data rows found (only headers or empty)"),
            LoadStatus::ListFailed(msg) => write!(f, "Error listing worksheets: {msg}"),
            LoadStatus::ReadFailed(msg) => write!(f, "Error loading data: {msg}"),
        }
    }
}

/// Result of [`load_clients`]: always a table, possibly empty
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Reconciled, cleaned records (empty on any failure)
    pub table: ClientTable,
    /// 1-based sheet row each record of `table` was read from
    pub sheet_rows: Vec<usize>,
    /// What happened
    pub status: LoadStatus,
    /// Worksheet the rows came from
    pub worksheet: Option<Resolution>,
    /// Columns added or dropped during reconciliation
    pub reconcile: ReconcileReport,
    /// Cleaning summary
    pub clean: CleanReport,
}

impl LoadOutcome {
    fn degraded(status: LoadStatus, worksheet: Option<Resolution>) -> Self {
        Self {
            table: ClientTable::new(),
            sheet_rows: Vec::new(),
            status,
            worksheet,
            reconcile: ReconcileReport::default(),
            clean: CleanReport::default(),
        }
    }
}

/// Read every client from the store.
///
/// Never fails: each step that can go wrong downgrades to an empty table
/// with a descriptive [`LoadStatus`].
pub fn load_clients<S: SheetStore + ?Sized>(store: &mut S, options: &LoadOptions) -> LoadOutcome {
    let titles = match store.worksheet_titles() {
        Ok(titles) => titles,
        Err(e) => {
            tracing::warn!("Listing worksheets failed: {e}");
            return LoadOutcome::degraded(LoadStatus::ListFailed(e.to_string()), None);
        }
    };

    let Some(resolution) = resolve_worksheet(&titles, &options.preferred, &options.fallbacks) else {
        return LoadOutcome::degraded(LoadStatus::NoWorksheets, None);
    };

    let grid = match store.read_values(&resolution.title) {
        Ok(grid) => grid,
        Err(e) => {
            tracing::warn!("Reading worksheet '{}' failed: {e}", resolution.title);
            return LoadOutcome::degraded(LoadStatus::ReadFailed(e.to_string()), Some(resolution));
        }
    };

    if grid.is_empty() {
        return LoadOutcome::degraded(LoadStatus::Empty, Some(resolution));
    }

    let raw = RawTable::from_grid(grid);
    if raw.row_count() == 0 {
        return LoadOutcome::degraded(LoadStatus::HeaderOnly, Some(resolution));
    }

    let (mut cleaned, reconcile) = reconcile(&raw);
    if !reconcile.is_exact() {
        tracing::warn!(
            "Worksheet '{}' header differs from the client schema; writes use the canonical column order",
            resolution.title
        );
    }
    let clean = clean_table(&mut cleaned, &options.clean);

    // Blank rows are skipped but still count towards sheet row numbers
    let mut table = ClientTable::new();
    let mut sheet_rows = Vec::with_capacity(cleaned.len());
    for (i, record) in cleaned.into_iter().enumerate() {
        if !record.is_blank() {
            sheet_rows.push(i + 2);
            table.push(record);
        }
    }
    let dropped = raw.row_count() - table.len();

    tracing::info!(
        "Loaded {} clients from '{}' ({} blank rows dropped)",
        table.len(),
        resolution.title,
        dropped
    );

    LoadOutcome {
        table,
        sheet_rows,
        status: LoadStatus::Success,
        worksheet: Some(resolution),
        reconcile,
        clean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::resolve::ResolvedBy;
    use pretty_assertions::assert_eq;

    fn row(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_reconciles_and_cleans() {
        let mut store = MemoryStore::new().with_worksheet(
            "Client Data",
            vec![
                row(&["first_name", "email", "notes"]),
                row(&["ada", " ADA@Example.com ", "x"]),
                row(&["", "", ""]),
            ],
        );
        let outcome = load_clients(&mut store, &LoadOptions::default());

        assert_eq!(outcome.status, LoadStatus::Success);
        assert_eq!(outcome.worksheet.unwrap().resolved_by, ResolvedBy::Fallback);
        assert_eq!(outcome.table.len(), 1);
        assert_eq!(outcome.table.get(0).unwrap().value("email"), "ada@example.com");
        assert_eq!(outcome.table.get(0).unwrap().value("first_name"), "Ada");
        assert_eq!(outcome.reconcile.extra, vec!["notes".to_string()]);
        assert_eq!(outcome.sheet_rows, vec![2]);
    }

    #[test]
    fn test_blank_rows_keep_sheet_numbering() {
        let mut store = MemoryStore::new().with_worksheet(
            "Clients",
            vec![
                row(&["first_name", "last_name"]),
                row(&["", ""]),
                row(&["ada", "lovelace"]),
                row(&["nan", " "]),
                row(&["grace", "hopper"]),
            ],
        );
        let outcome = load_clients(&mut store, &LoadOptions::default());

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.sheet_rows, vec![3, 5]);
        assert_eq!(outcome.table.get(1).unwrap().value("first_name"), "Grace");
    }

    #[test]
    fn test_empty_and_header_only() {
        let mut store = MemoryStore::new().with_worksheet("Clients", Vec::new());
        let outcome = load_clients(&mut store, &LoadOptions::default());
        assert_eq!(outcome.status, LoadStatus::Empty);
        assert_eq!(outcome.status.to_string(), "Sheet is empty");

        let mut store = MemoryStore::new().with_worksheet("Clients", vec![row(&["first_name"])]);
        let outcome = load_clients(&mut store, &LoadOptions::default());
        assert_eq!(outcome.status, LoadStatus::HeaderOnly);
        assert!(outcome.table.is_empty());
    }

    #[test]
    fn test_no_worksheets() {
        let outcome = load_clients(&mut MemoryStore::new(), &LoadOptions::default());
        assert_eq!(outcome.status, LoadStatus::NoWorksheets);
        assert!(outcome.worksheet.is_none());
    }
}
