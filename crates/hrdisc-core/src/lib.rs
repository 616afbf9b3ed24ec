//! # hrdisc-core
//!
//! Core data structures and transformations for HR DISC client records.
//!
//! This crate provides:
//! - [`FIELDS`] - The fixed 27-field client schema and its categories
//! - [`ClientRecord`], [`ClientTable`], [`RawTable`] - Records and tables
//! - [`reconcile`] - Aligning arbitrary tables to the schema
//! - [`clean_table`] - Per-column cleaning with column-level fault isolation
//! - [`completeness`] - Completeness scoring
//! - [`format_field_value`], [`ProfileView`] - Display formatting
//!
//! ## Example
//!
//! ```rust
//! use hrdisc_core::{clean_table, reconcile, CleanOptions, RawTable};
//!
//! let raw = RawTable::new(
//!     vec!["email".into(), "first_name".into()],
//!     vec![vec!["  ADA@Example.COM ".into(), "ada".into()]],
//! );
//! let (mut table, _report) = reconcile(&raw);
//! clean_table(&mut table, &CleanOptions::default());
//!
//! let ada = table.get(0).unwrap();
//! assert_eq!(ada.value("email"), "ada@example.com");
//! assert_eq!(ada.value("first_name"), "Ada");
//! ```

pub mod clean;
pub mod date;
pub mod error;
pub mod field;
pub mod format;
pub mod reconcile;
pub mod record;
pub mod refresh;
pub mod score;
pub mod table;
pub mod validate;
pub mod view;

// Re-exports for convenience
pub use clean::{
    clean_email, clean_name, clean_narrative, clean_phone, clean_record, clean_table, is_valid_email,
    CleanError, CleanOptions, CleanReport, ColumnFailure, EMAIL_PATTERN,
};
pub use date::parse_date;
pub use error::{Error, Result};
pub use field::{
    field_index, field_label, field_names, field_spec, is_blank, is_narrative, title_case, FieldCategory,
    FieldKind, FieldSpec, FIELDS, FIELD_COUNT, SORTABLE_FIELDS,
};
pub use format::{format_field_value, truncate, DisplayValue, FormatOptions};
pub use reconcile::{reconcile, ReconcileReport};
pub use record::ClientRecord;
pub use refresh::RefreshPolicy;
pub use score::{completeness, CompletenessTier};
pub use table::{ClientTable, RawTable};
pub use validate::{prepare_submission, validate_submission, FieldIssue, IssueKind, REQUIRED_FIELDS};
pub use view::{mailto_link, tel_link, FieldRow, ListEntry, ProfileSection, ProfileView};
