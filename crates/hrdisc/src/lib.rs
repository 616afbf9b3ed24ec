//! # hrdisc
//!
//! HR DISC client records: cleaning, completeness scoring, display
//! formatting, CSV/JSON export and worksheet sync.
//!
//! ## Features
//!
//! - Fixed 27-field client schema with five categories
//! - Schema reconciliation of arbitrary tables
//! - Per-column cleaning with column-level fault isolation
//! - Completeness scoring and profile/list view models
//! - Quote-all CSV export that keeps multi-paragraph narratives intact
//! - JSON export of full, untruncated values
//! - Google Sheets storage through a service account, or an in-memory store
//!
//! ## Example
//!
//! ```rust
//! use hrdisc::prelude::*;
//!
//! let store = MemoryStore::new().with_worksheet(
//!     "Clients",
//!     vec![
//!         vec!["first_name".into(), "last_name".into(), "email".into()],
//!         vec!["ada".into(), "lovelace".into(), " ADA@Example.com".into()],
//!     ],
//! );
//!
//! let mut session = Session::new(Some(Box::new(store)), &CrmConfig::default());
//! session.ensure_loaded();
//!
//! let ada = session.record(0).unwrap();
//! assert_eq!(ada.value("email"), "ada@example.com");
//! assert_eq!(ada.full_name(), "Ada Lovelace");
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod prelude;
pub mod session;

pub use config::CrmConfig;
pub use error::{Error, Result};
pub use export::{export_file_name, profile_file_name, to_json, TableStats, TABLE_EXPORT_STEM};
pub use session::{connect_store, Session};

// Re-export core types
pub use hrdisc_core::{
    clean_record, clean_table, completeness, field_label, field_names, format_field_value, is_blank, mailto_link,
    reconcile, tel_link,
    validate_submission, ClientRecord, ClientTable, CleanOptions, CleanReport, CompletenessTier, DisplayValue,
    FieldCategory, FieldIssue, FieldKind, FieldSpec, FormatOptions, IssueKind, ListEntry, ProfileSection,
    ProfileView, RawTable, RefreshPolicy, FIELDS, FIELD_COUNT, SORTABLE_FIELDS,
};

// Re-export I/O types
pub use hrdisc_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
pub use hrdisc_sheets::{
    GoogleSheetsConfig, GoogleSheetsStore, LoadOptions, LoadOutcome, LoadStatus, MemoryStore, MutationOutcome,
    Resolution, ResolvedBy, RowWriteOptions, ServiceAccountKey, SheetStore, SheetsError,
};
