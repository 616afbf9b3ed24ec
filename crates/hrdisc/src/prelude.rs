//! Prelude module - common imports for hrdisc users
//!
//! ```rust
//! use hrdisc::prelude::*;
//! ```

pub use crate::{
    // Records and tables
    ClientRecord,
    ClientTable,
    CompletenessTier,
    // Configuration
    CrmConfig,

    // I/O types
    CsvReader,
    CsvWriter,
    DisplayValue,

    // Error types
    Error,
    FieldCategory,
    ListEntry,
    LoadStatus,
    // Stores
    MemoryStore,
    MutationOutcome,
    ProfileView,
    Result,

    // Session
    Session,
    SheetStore,
    TableStats,
};
