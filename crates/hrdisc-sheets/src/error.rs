//! Worksheet store error types

use thiserror::Error;

/// Result type for store operations
pub type SheetsResult<T> = std::result::Result<T, SheetsError>;

/// Errors that can occur talking to a worksheet store
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Credential document malformed or rejected
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// No worksheet with this title
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    /// A worksheet with this title already exists
    #[error("Worksheet already exists: {0}")]
    DuplicateWorksheet(String),

    /// The store refused a write
    #[error("Write rejected: {0}")]
    WriteRejected(String),

    /// The remote API answered with an error status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Token signing error
    #[error("Token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl SheetsError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SheetsError::Other(msg.into())
    }
}
