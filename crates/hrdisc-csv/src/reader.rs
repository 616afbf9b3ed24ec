//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use hrdisc_core::{clean_table, reconcile, ClientTable, RawTable};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a raw table
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<RawTable> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a raw table.
    ///
    /// The first row is the header. Rows may be shorter or longer than the
    /// header; [`RawTable`] normalises them.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<RawTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| {
                let h = h.trim_start_matches('\u{feff}');
                if options.trim_headers {
                    h.trim().to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(CsvError::MissingHeader);
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(RawTable::new(headers, rows))
    }

    /// Read a CSV file as client records: reconciled to the schema, cleaned,
    /// blank rows dropped
    pub fn import_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<ClientTable> {
        let file = File::open(path)?;
        Self::import(file, options)
    }

    /// Read CSV from a reader as client records
    pub fn import<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<ClientTable> {
        let raw = Self::read(reader, options)?;
        let (mut table, report) = reconcile(&raw);
        if !report.missing.is_empty() {
            tracing::info!("CSV import: {} schema columns missing, filled empty", report.missing.len());
        }
        let cleaned = clean_table(&mut table, &options.clean);
        if !cleaned.failures.is_empty() {
            tracing::warn!("CSV import: {} values could not be cleaned", cleaned.failures.len());
        }
        table.drop_blank_rows();
        Ok(table)
    }
}
