//! Writing clients back to the store
//!
//! Every operation here catches store errors and reports them through
//! [`MutationOutcome`]; nothing propagates past this boundary.

use std::fmt;

use hrdisc_core::{is_narrative, ClientRecord, ClientTable};
use hrdisc_csv::escape_quotes;

use crate::error::SheetsResult;
use crate::store::SheetStore;

/// Options for building rows sent to the store
#[derive(Debug, Clone, Default)]
pub struct RowWriteOptions {
    /// Double `"` inside narrative values before sending them.
    ///
    /// Off by default: the store keeps values verbatim, so doubling here
    /// would change what is read back on the next load.
    pub escape_narrative_quotes: bool,
}

/// Success flag plus a user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Whether the write went through
    pub ok: bool,
    /// What to show the user
    pub message: String,
}

impl MutationOutcome {
    /// A successful write
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    /// A failed write
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A record as a sheet row in canonical field order.
///
/// Narrative quotes are doubled only when
/// [`RowWriteOptions::escape_narrative_quotes`] is set (config key
/// `escape_narrative_quotes`).
pub fn build_row(record: &ClientRecord, options: &RowWriteOptions) -> Vec<String> {
    record
        .iter()
        .map(|(field, value)| {
            if options.escape_narrative_quotes && is_narrative(field) {
                escape_quotes(value)
            } else {
                value.to_string()
            }
        })
        .collect()
}

fn ensure_worksheet<S: SheetStore + ?Sized>(store: &mut S, title: &str) -> SheetsResult<()> {
    if store.worksheet_titles()?.iter().any(|t| t == title) {
        return Ok(());
    }
    tracing::info!("Creating worksheet '{title}' with header row");
    store.add_worksheet(title)?;
    store.write_values(title, &[ClientTable::headers()])
}

/// Append a client as a new row, creating the worksheet if needed
pub fn append_client<S: SheetStore + ?Sized>(
    store: &mut S,
    title: &str,
    record: &ClientRecord,
    options: &RowWriteOptions,
) -> MutationOutcome {
    let result = ensure_worksheet(store, title).and_then(|()| store.append_row(title, &build_row(record, options)));
    match result {
        Ok(()) => {
            tracing::info!("Appended client to '{title}'");
            MutationOutcome::success("Client added successfully")
        }
        Err(e) => {
            tracing::warn!("Append to '{title}' failed: {e}");
            MutationOutcome::failure(format!("Error adding client: {e}"))
        }
    }
}

/// Sheet row of data row `index` in a worksheet with no blank rows
pub fn data_row_number(index: usize) -> usize {
    // Header occupies sheet row 1
    index + 2
}

/// Overwrite 1-based sheet row `row_number` with a client.
///
/// Use the row the client was loaded from ([`crate::LoadOutcome::sheet_rows`]);
/// the table index alone is wrong once blank rows were skipped.
pub fn update_client<S: SheetStore + ?Sized>(
    store: &mut S,
    title: &str,
    row_number: usize,
    record: &ClientRecord,
    options: &RowWriteOptions,
) -> MutationOutcome {
    if row_number < 2 {
        return MutationOutcome::failure(format!("Error updating client: row {row_number} is the header"));
    }
    match store.update_row(title, row_number, &build_row(record, options)) {
        Ok(()) => {
            tracing::info!("Updated row {row_number} of '{title}'");
            MutationOutcome::success("Client updated successfully")
        }
        Err(e) => {
            tracing::warn!("Update of row {row_number} in '{title}' failed: {e}");
            MutationOutcome::failure(format!("Error updating client: {e}"))
        }
    }
}

/// Title of the worksheet a sync builds before swapping it in
pub fn staging_title(title: &str) -> String {
    format!("{title} (sync)")
}

/// Replace the whole worksheet with `table`.
///
/// The replacement is written to a staging worksheet first, then the old
/// worksheet is deleted and the staging one renamed. A document cannot lose
/// its last worksheet, so the old one is never deleted before the new one
/// exists. Changes made remotely since the last read are overwritten.
pub fn sync_table<S: SheetStore + ?Sized>(store: &mut S, title: &str, table: &ClientTable) -> MutationOutcome {
    let result = (|| -> SheetsResult<()> {
        let mut rows = Vec::with_capacity(table.len() + 1);
        rows.push(ClientTable::headers());
        rows.extend(table.to_rows());

        let titles = store.worksheet_titles()?;
        if !titles.iter().any(|t| t == title) {
            store.add_worksheet(title)?;
            return store.write_values(title, &rows);
        }

        let staging = staging_title(title);
        if titles.iter().any(|t| *t == staging) {
            tracing::debug!("Removing leftover worksheet '{staging}'");
            store.delete_worksheet(&staging)?;
        }
        store.add_worksheet(&staging)?;
        store.write_values(&staging, &rows)?;
        store.delete_worksheet(title)?;
        store.rename_worksheet(&staging, title)
    })();

    match result {
        Ok(()) => {
            tracing::info!("Synced {} clients to '{title}'", table.len());
            MutationOutcome::success(format!("Synced {} clients", table.len()))
        }
        Err(e) => {
            tracing::warn!("Sync of '{title}' failed: {e}");
            MutationOutcome::failure(format!("Error syncing data: {e}"))
        }
    }
}
