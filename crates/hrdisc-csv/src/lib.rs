//! # hrdisc-csv
//!
//! CSV import and export for hrdisc client tables.
//!
//! Exports quote every field so multi-paragraph DISC narratives survive a
//! round trip through any RFC 4180 reader. Imports accept any column set and
//! reconcile it to the client schema.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::{escape_quotes, export_value, CsvWriter};
