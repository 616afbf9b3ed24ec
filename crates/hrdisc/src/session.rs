//! One interactive session: the cached client table and the operations on it
//!
//! The remote worksheet is the only persistent state. A [`Session`] holds a
//! disposable copy of it, reloads when its [`RefreshPolicy`] says so, and
//! invalidates the copy after every successful remote write.

use std::path::Path;
use std::time::Instant;

use hrdisc_core::{
    clean_record, prepare_submission, CleanOptions, ClientRecord, ClientTable, Error as CoreError, FormatOptions,
    ListEntry, ProfileView, RefreshPolicy,
};
use hrdisc_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use hrdisc_sheets::{
    append_client, data_row_number, load_clients, sync_table, update_client, GoogleSheetsConfig, GoogleSheetsStore,
    LoadOptions, LoadStatus, MutationOutcome, Resolution, RowWriteOptions, ServiceAccountKey, SheetStore,
};

use crate::config::CrmConfig;
use crate::error::{Error, Result};
use crate::export::{to_json, TableStats};

/// Open the remote store described by `config`.
///
/// Returns `Ok(None)` when no document or key is configured.
pub fn connect_store(config: &CrmConfig) -> Result<Option<Box<dyn SheetStore>>> {
    let (Some(id), Some(key_path)) = (&config.spreadsheet_id, &config.credentials_path) else {
        return Ok(None);
    };
    let key = ServiceAccountKey::from_file(key_path)?;
    let mut settings = GoogleSheetsConfig::new(id.clone());
    settings.timeout = config.http_timeout();
    let store: Box<dyn SheetStore> = Box::new(GoogleSheetsStore::connect(key, settings)?);
    Ok(Some(store))
}

/// Cached client table plus the store it came from
pub struct Session {
    store: Option<Box<dyn SheetStore>>,
    table: ClientTable,
    // Sheet row per record; `None` until the record reaches the worksheet
    sheet_rows: Vec<Option<usize>>,
    status: LoadStatus,
    worksheet: Option<Resolution>,
    refresh: RefreshPolicy,
    load_options: LoadOptions,
    row_options: RowWriteOptions,
    format_options: FormatOptions,
}

impl Session {
    /// Session over `store`; `None` runs local-only
    pub fn new(store: Option<Box<dyn SheetStore>>, config: &CrmConfig) -> Self {
        Self {
            store,
            table: ClientTable::new(),
            sheet_rows: Vec::new(),
            status: LoadStatus::NotConnected,
            worksheet: None,
            refresh: RefreshPolicy::new(config.refresh_interval()),
            load_options: config.load_options(),
            row_options: config.row_write_options(),
            format_options: config.format_options(),
        }
    }

    /// Session with remote features disabled
    pub fn local(config: &CrmConfig) -> Self {
        Self::new(None, config)
    }

    /// Whether writes can reach a store
    pub fn is_remote(&self) -> bool {
        self.store.is_some()
    }

    /// Outcome of the last load
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Worksheet resolved by the last successful listing
    pub fn worksheet(&self) -> Option<&Resolution> {
        self.worksheet.as_ref()
    }

    /// Browser link to the remote document
    pub fn document_url(&self) -> Option<String> {
        self.store.as_ref().and_then(|s| s.document_url())
    }

    /// Display settings in effect
    pub fn format_options(&self) -> &FormatOptions {
        &self.format_options
    }

    /// Cleaning settings in effect
    pub fn clean_options(&self) -> &CleanOptions {
        &self.load_options.clean
    }

    /// Cached records
    pub fn table(&self) -> &ClientTable {
        &self.table
    }

    /// Reload if the cache is stale; returns whether a reload happened
    pub fn ensure_loaded(&mut self) -> bool {
        self.ensure_loaded_at(Instant::now())
    }

    /// [`Session::ensure_loaded`] with an explicit clock reading
    pub fn ensure_loaded_at(&mut self, now: Instant) -> bool {
        if !self.refresh.is_due(now) {
            return false;
        }
        self.reload_at(now);
        true
    }

    /// Discard the cache and read the worksheet again
    pub fn reload(&mut self) -> &LoadStatus {
        self.reload_at(Instant::now())
    }

    fn reload_at(&mut self, now: Instant) -> &LoadStatus {
        match self.store.as_mut() {
            Some(store) => {
                let outcome = load_clients(store.as_mut(), &self.load_options);
                if !outcome.status.is_success() {
                    tracing::warn!("Load finished with status: {}", outcome.status);
                }
                self.table = outcome.table;
                self.sheet_rows = outcome.sheet_rows.into_iter().map(Some).collect();
                self.status = outcome.status;
                if outcome.worksheet.is_some() {
                    self.worksheet = outcome.worksheet;
                }
            }
            None => {
                tracing::debug!("No store configured; keeping local table");
                self.status = LoadStatus::NotConnected;
            }
        }
        self.refresh.mark_loaded(now);
        &self.status
    }

    /// Force a reload at the next [`Session::ensure_loaded`]
    pub fn invalidate(&mut self) {
        self.refresh.invalidate();
    }

    /// Record at `index` of the cached table
    pub fn record(&self, index: usize) -> Result<&ClientRecord> {
        self.table
            .get(index)
            .ok_or_else(|| CoreError::RecordOutOfBounds(index, self.table.len()).into())
    }

    /// List entries matching `search`, ordered by `sort_by` when given
    pub fn list(&self, search: Option<&str>, sort_by: Option<&str>) -> Result<Vec<ListEntry>> {
        let mut indices = self.table.search(search.unwrap_or(""));
        if let Some(field) = sort_by {
            self.table.sort_indices(&mut indices, field)?;
        }
        Ok(indices
            .into_iter()
            .filter_map(|i| self.table.get(i).map(|r| ListEntry::new(i, r)))
            .collect())
    }

    /// Profile view of the record at `index`
    pub fn profile(&self, index: usize) -> Result<ProfileView> {
        Ok(ProfileView::new(self.record(index)?, &self.format_options))
    }

    /// 1-based worksheet row the record at `index` was loaded from.
    ///
    /// `None` for records that only exist locally (imported and not yet
    /// synced).
    pub fn sheet_row(&self, index: usize) -> Option<usize> {
        self.sheet_rows.get(index).copied().flatten()
    }

    /// Worksheets in the remote document
    pub fn worksheet_titles(&mut self) -> Result<Vec<String>> {
        let store = self.store.as_mut().ok_or(Error::RemoteDisabled)?;
        Ok(store.worksheet_titles()?)
    }

    fn target_worksheet(&self) -> String {
        self.worksheet
            .as_ref()
            .map(|w| w.title.clone())
            .unwrap_or_else(|| self.load_options.preferred.clone())
    }

    fn prepare(&self, record: &mut ClientRecord) -> Result<()> {
        prepare_submission(record).map_err(Error::Validation)?;
        let report = clean_record(record, &self.load_options.clean);
        if !report.failures.is_empty() {
            tracing::debug!("{} submitted values kept as entered", report.failures.len());
        }
        Ok(())
    }

    /// Validate a new client and append it to the worksheet.
    ///
    /// Validation failures return [`Error::Validation`] and write nothing.
    /// Write failures come back as an unsuccessful [`MutationOutcome`].
    pub fn add_client(&mut self, mut record: ClientRecord) -> Result<MutationOutcome> {
        if self.store.is_none() {
            return Err(Error::RemoteDisabled);
        }
        self.prepare(&mut record)?;

        let title = self.target_worksheet();
        let store = self.store.as_mut().ok_or(Error::RemoteDisabled)?;
        let outcome = append_client(store.as_mut(), &title, &record, &self.row_options);
        if outcome.ok {
            self.invalidate();
        }
        Ok(outcome)
    }

    /// Validate an edited client and overwrite its row
    pub fn edit_client(&mut self, index: usize, mut record: ClientRecord) -> Result<MutationOutcome> {
        if self.store.is_none() {
            return Err(Error::RemoteDisabled);
        }
        self.record(index)?;
        let row_number = self.sheet_row(index).ok_or(Error::NotOnWorksheet(index))?;
        self.prepare(&mut record)?;

        let title = self.target_worksheet();
        let store = self.store.as_mut().ok_or(Error::RemoteDisabled)?;
        let outcome = update_client(store.as_mut(), &title, row_number, &record, &self.row_options);
        if outcome.ok {
            self.invalidate();
        }
        Ok(outcome)
    }

    /// Remove a client from the cached table, optionally syncing the worksheet.
    ///
    /// Without a sync the removal lasts only until the next reload.
    pub fn delete_client(&mut self, index: usize, sync: bool) -> Result<(ClientRecord, Option<MutationOutcome>)> {
        if sync && self.store.is_none() {
            return Err(Error::RemoteDisabled);
        }
        let removed = self.table.remove(index)?;
        if index < self.sheet_rows.len() {
            self.sheet_rows.remove(index);
        }
        tracing::info!("Removed client '{}' from the local table", removed.full_name());
        let outcome = if sync { Some(self.sync()?) } else { None };
        Ok((removed, outcome))
    }

    /// Replace the worksheet with the cached table
    pub fn sync(&mut self) -> Result<MutationOutcome> {
        let title = self.target_worksheet();
        let store = self.store.as_mut().ok_or(Error::RemoteDisabled)?;
        let outcome = sync_table(store.as_mut(), &title, &self.table);
        if outcome.ok {
            self.sheet_rows = (0..self.table.len()).map(|i| Some(data_row_number(i))).collect();
        }
        Ok(outcome)
    }

    /// Merge a CSV file into the cached table, skipping exact duplicates.
    ///
    /// Returns the number of records added.
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let options = CsvReadOptions {
            clean: self.load_options.clean.clone(),
            ..Default::default()
        };
        let imported = CsvReader::import_file(path.as_ref(), &options)?;
        let read = imported.len();
        let added = self.table.merge_dedup(imported);
        self.sheet_rows.resize(self.table.len(), None);
        tracing::info!(
            "Imported {} of {} records from {} ({} duplicates skipped)",
            added,
            read,
            path.as_ref().display(),
            read - added
        );
        Ok(added)
    }

    fn selection(&self, client: Option<usize>) -> Result<&[ClientRecord]> {
        match client {
            Some(index) => {
                self.record(index)?;
                Ok(&self.table.records()[index..=index])
            }
            None => Ok(self.table.records()),
        }
    }

    /// The whole table, or one client, as quote-all CSV
    pub fn export_csv(&self, client: Option<usize>) -> Result<String> {
        let records = self.selection(client)?;
        Ok(CsvWriter::records_to_string(records, &CsvWriteOptions::default())?)
    }

    /// The whole table, or one client, as a JSON array
    pub fn export_json(&self, client: Option<usize>) -> Result<String> {
        to_json(self.selection(client)?)
    }

    /// Dashboard figures for the cached table
    pub fn stats(&self) -> TableStats {
        TableStats::from_table(&self.table)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("remote", &self.is_remote())
            .field("records", &self.table.len())
            .field("status", &self.status)
            .field("worksheet", &self.worksheet)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_local_session_keeps_table_on_reload() {
        let mut session = Session::local(&CrmConfig::default());
        session.table.push(ClientRecord::from_pairs([("first_name", "Ada")]));

        assert!(session.ensure_loaded());
        assert_eq!(session.status(), &LoadStatus::NotConnected);
        assert_eq!(session.table().len(), 1);
        assert!(!session.ensure_loaded());
    }

    #[test]
    fn test_refresh_interval_triggers_reload() {
        let config = CrmConfig {
            refresh_secs: Some(30),
            ..Default::default()
        };
        let mut session = Session::local(&config);
        let start = Instant::now();

        assert!(session.ensure_loaded_at(start));
        assert!(!session.ensure_loaded_at(start + Duration::from_secs(10)));
        assert!(session.ensure_loaded_at(start + Duration::from_secs(31)));
        assert!(!session.ensure_loaded_at(start + Duration::from_secs(40)));
    }

    #[test]
    fn test_writes_need_a_store() {
        let mut session = Session::local(&CrmConfig::default());
        let ada = ClientRecord::from_pairs([("first_name", "Ada")]);
        assert!(matches!(session.add_client(ada), Err(Error::RemoteDisabled)));
        assert!(matches!(session.sync(), Err(Error::RemoteDisabled)));
        assert!(matches!(session.worksheet_titles(), Err(Error::RemoteDisabled)));
    }

    #[test]
    fn test_connect_store_without_config() {
        assert!(connect_store(&CrmConfig::default()).unwrap().is_none());
    }
}
