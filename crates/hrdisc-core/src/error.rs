//! Error types for hrdisc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in hrdisc-core
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Field name is not part of the fixed client schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Record index out of bounds
    #[error("Record index {0} out of bounds (count: {1})")]
    RecordOutOfBounds(usize, usize),

    /// Field not usable as a sort key
    #[error("Field cannot be used for sorting: {0}")]
    UnsortableField(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
