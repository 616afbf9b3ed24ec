//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use hrdisc_core::{field_names, ClientRecord, ClientTable};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a client table to a CSV file
    pub fn write_file<P: AsRef<Path>>(table: &ClientTable, path: P, options: &CsvWriteOptions) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table.records(), file, options)
    }

    /// Write a client table to a string
    pub fn table_to_string(table: &ClientTable, options: &CsvWriteOptions) -> CsvResult<String> {
        Self::records_to_string(table.records(), options)
    }

    /// Write any slice of records to a string
    pub fn records_to_string(records: &[ClientRecord], options: &CsvWriteOptions) -> CsvResult<String> {
        let mut buf = Vec::new();
        Self::write(records, &mut buf, options)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Write records to a writer: header row, then one row per record in
    /// canonical field order.
    ///
    /// Quote characters inside values are doubled by the encoder and line
    /// breaks inside narrative text are kept, so multi-paragraph values stay
    /// inside their field.
    pub fn write<W: Write>(records: &[ClientRecord], writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };
        let quote_style = if options.quote_all {
            csv::QuoteStyle::Always
        } else {
            csv::QuoteStyle::Necessary
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .quote_style(quote_style)
            .double_quote(true)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(field_names())?;
        }

        for record in records {
            csv_writer.write_record(record.values().iter().map(|v| export_value(v)))?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

/// Value as written to an export: surrounding whitespace removed, inner
/// line breaks and quotes left for the encoder
pub fn export_value(value: &str) -> &str {
    value.trim()
}

/// Double every `"` in `text`, the quoting rule of CSV fields.
///
/// Used when a value is handed to a consumer that stores it verbatim inside
/// a quoted field it does not escape itself.
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdisc_core::FIELD_COUNT;

    #[test]
    fn test_header_and_quote_all() {
        let record = ClientRecord::from_pairs([("first_name", "Ada")]);
        let out = CsvWriter::records_to_string(&[record], &CsvWriteOptions::default()).unwrap();
        let mut lines = out.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("\"first_name\",\"last_name\""));
        assert_eq!(header.matches(',').count(), FIELD_COUNT - 1);

        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Ada\",\"\","));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_embedded_quote_is_doubled_once() {
        let record = ClientRecord::from_pairs([("discprofile", "says \"hi\"")]);
        let out = CsvWriter::records_to_string(&[record], &CsvWriteOptions::default()).unwrap();
        assert!(out.contains("\"says \"\"hi\"\"\""));
        assert!(!out.contains("\"\"\"\"hi"));
    }

    #[test]
    fn test_without_header() {
        let options = CsvWriteOptions {
            write_header: false,
            ..Default::default()
        };
        let out = CsvWriter::records_to_string(&[ClientRecord::new()], &options).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"a "b" c"#), r#"a ""b"" c"#);
        assert_eq!(escape_quotes("plain"), "plain");
    }
}
