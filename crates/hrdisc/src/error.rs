//! Facade error types

use hrdisc_core::FieldIssue;
use thiserror::Error;

/// Result type for session and configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::Session`] and [`crate::CrmConfig`]
#[derive(Debug, Error)]
pub enum Error {
    /// Record or table error
    #[error(transparent)]
    Core(#[from] hrdisc_core::Error),

    /// CSV import or export failed
    #[error(transparent)]
    Csv(#[from] hrdisc_csv::CsvError),

    /// Worksheet store error
    #[error(transparent)]
    Sheets(#[from] hrdisc_sheets::SheetsError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Submitted form failed validation; nothing was written
    #[error("{}", join_issues(.0))]
    Validation(Vec<FieldIssue>),

    /// The record has no worksheet row yet; sync before editing it
    #[error("Client {0} is not on the worksheet yet; sync first")]
    NotOnWorksheet(usize),

    /// No authenticated store is available
    #[error("Remote features are disabled (no credentials configured)")]
    RemoteDisabled,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrdisc_core::IssueKind;

    #[test]
    fn test_validation_message_lists_every_issue() {
        let err = Error::Validation(vec![
            FieldIssue {
                field: "first_name",
                kind: IssueKind::Missing,
            },
            FieldIssue {
                field: "email",
                kind: IssueKind::InvalidEmail,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "First Name is required; Email is not a valid email address"
        );
    }
}
