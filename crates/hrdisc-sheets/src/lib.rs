//! # hrdisc-sheets
//!
//! The worksheet document that holds client records.
//!
//! A [`SheetStore`] is a spreadsheet made of named worksheets. Two stores are
//! provided: [`MemoryStore`] for tests and offline use, and
//! [`GoogleSheetsStore`] which talks to the Sheets v4 REST API as a service
//! account.
//!
//! On top of a store:
//! - [`load_clients`] resolves the client worksheet, reads it, reconciles it
//!   to the schema and cleans it, and never fails
//! - [`append_client`], [`update_client`], [`sync_table`] write back and
//!   report through [`MutationOutcome`]
//!
//! ## Example
//!
//! ```rust
//! use hrdisc_core::ClientRecord;
//! use hrdisc_sheets::{append_client, load_clients, LoadOptions, MemoryStore, RowWriteOptions};
//!
//! let mut store = MemoryStore::new();
//! let ada = ClientRecord::from_pairs([("first_name", "Ada"), ("email", "ada@example.com")]);
//! assert!(append_client(&mut store, "Clients", &ada, &RowWriteOptions::default()).ok);
//!
//! let outcome = load_clients(&mut store, &LoadOptions::default());
//! assert_eq!(outcome.table.len(), 1);
//! ```

mod credentials;
mod error;
mod google;
mod load;
mod memory;
mod mutate;
mod resolve;
mod store;

pub use credentials::{AccessToken, ServiceAccountKey, DEFAULT_TOKEN_URI, SPREADSHEETS_SCOPE};
pub use error::{SheetsError, SheetsResult};
pub use google::{GoogleSheetsConfig, GoogleSheetsStore, SHEETS_API_BASE};
pub use load::{load_clients, LoadOptions, LoadOutcome, LoadStatus};
pub use memory::MemoryStore;
pub use mutate::{
    append_client, build_row, data_row_number, staging_title, sync_table, update_client, MutationOutcome,
    RowWriteOptions,
};
pub use resolve::{resolve_worksheet, Resolution, ResolvedBy, FALLBACK_WORKSHEETS};
pub use store::{column_letters, quote_title, row_range, SheetStore};
