//! Validation of submitted client forms

use std::fmt;

use crate::clean::is_valid_email;
use crate::date::parse_date;
use crate::field::{field_label, is_blank};
use crate::record::ClientRecord;

/// Fields a submission must supply
pub const REQUIRED_FIELDS: [&str; 3] = ["first_name", "last_name", "email"];

/// What is wrong with one submitted field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Required but blank
    Missing,
    /// Email does not match the address pattern
    InvalidEmail,
    /// Phone shorter than the minimum length
    PhoneTooShort,
    /// Birth date could not be parsed
    InvalidDate,
}

/// A field-level validation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Offending field
    pub field: &'static str,
    /// Problem
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = field_label(self.field);
        match self.kind {
            IssueKind::Missing => write!(f, "{label} is required"),
            IssueKind::InvalidEmail => write!(f, "{label} is not a valid email address"),
            IssueKind::PhoneTooShort => write!(f, "{label} must be at least 7 characters"),
            IssueKind::InvalidDate => write!(f, "{label} is not a recognisable date"),
        }
    }
}

/// Check a submitted record; an empty result means it may be written
pub fn validate_submission(record: &ClientRecord) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for field in REQUIRED_FIELDS {
        if is_blank(record.value(field)) {
            issues.push(FieldIssue {
                field,
                kind: IssueKind::Missing,
            });
        }
    }

    let email = record.value("email").trim();
    if !is_blank(email) && !is_valid_email(&email.to_lowercase()) {
        issues.push(FieldIssue {
            field: "email",
            kind: IssueKind::InvalidEmail,
        });
    }

    let phone = record.value("phone").trim();
    if !phone.is_empty() && phone.chars().count() < 7 {
        issues.push(FieldIssue {
            field: "phone",
            kind: IssueKind::PhoneTooShort,
        });
    }

    let dob = record.value("date_of_birth");
    if !is_blank(dob) && parse_date(dob).is_none() {
        issues.push(FieldIssue {
            field: "date_of_birth",
            kind: IssueKind::InvalidDate,
        });
    }

    issues
}

/// Validate, then fill `full_name` when it is blank.
///
/// On failure the record is left untouched and every issue is returned.
pub fn prepare_submission(record: &mut ClientRecord) -> Result<(), Vec<FieldIssue>> {
    let issues = validate_submission(record);
    if !issues.is_empty() {
        return Err(issues);
    }
    record.derive_full_name();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid() -> ClientRecord {
        ClientRecord::from_pairs([
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("email", "Ada@Example.com"),
        ])
    }

    #[test]
    fn test_valid_submission_derives_full_name() {
        let mut record = valid();
        prepare_submission(&mut record).unwrap();
        assert_eq!(record.value("full_name"), "Ada Lovelace");
    }

    #[test]
    fn test_missing_required_fields() {
        let issues = validate_submission(&ClientRecord::new());
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["first_name", "last_name", "email"]);
        assert_eq!(issues[0].to_string(), "First Name is required");
    }

    #[test]
    fn test_format_issues() {
        let mut record = valid();
        record.set("email", "nope").unwrap();
        record.set("phone", "123").unwrap();
        record.set("date_of_birth", "whenever").unwrap();

        let kinds: Vec<_> = validate_submission(&record).iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::InvalidEmail, IssueKind::PhoneTooShort, IssueKind::InvalidDate]
        );
        assert!(prepare_submission(&mut record).is_err());
        assert_eq!(record.value("full_name"), "");
    }
}
