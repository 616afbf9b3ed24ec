//! View models for list and profile screens

use std::fmt;

use crate::field::{field_label, is_blank, FieldCategory};
use crate::format::{format_field_value, DisplayValue, FormatOptions};
use crate::record::ClientRecord;
use crate::score::{completeness, CompletenessTier};

/// One line of the client list
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// Position in the underlying table
    pub index: usize,
    /// Full name or "Unknown"
    pub name: String,
    /// Email or "No email"
    pub email: String,
    /// Company reference or "No company"
    pub company: String,
    /// Completeness percentage
    pub completeness: f64,
}

impl ListEntry {
    /// Summarise a record for the list view
    pub fn new(index: usize, record: &ClientRecord) -> Self {
        Self {
            index,
            name: or_default(&record.full_name(), "Unknown"),
            email: or_default(record.value("email"), "No email"),
            company: or_default(record.value("company_id"), "No company"),
            completeness: completeness(record),
        }
    }

    /// Completeness band
    pub fn tier(&self) -> CompletenessTier {
        CompletenessTier::from_percent(self.completeness)
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) - {} [{:.0}% complete]",
            self.tier().marker(),
            self.name,
            self.email,
            self.company,
            self.completeness
        )
    }
}

/// A labelled, formatted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    /// Field name
    pub field: &'static str,
    /// Human label
    pub label: String,
    /// Formatted value
    pub value: DisplayValue,
}

/// One category block of a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSection {
    /// Category
    pub category: FieldCategory,
    /// Rows in category order
    pub rows: Vec<FieldRow>,
}

/// Everything needed to render one client's profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    /// Full name or "Unknown Client"
    pub name: String,
    /// Email or "No email provided"
    pub email: String,
    /// Completeness percentage
    pub completeness: f64,
    /// Category sections in display order
    pub sections: Vec<ProfileSection>,
}

impl ProfileView {
    /// Build the profile of a record
    pub fn new(record: &ClientRecord, options: &FormatOptions) -> Self {
        let sections = FieldCategory::ALL
            .iter()
            .map(|&category| ProfileSection {
                category,
                rows: category
                    .fields()
                    .iter()
                    .map(|&field| FieldRow {
                        field,
                        label: field_label(field),
                        value: format_field_value(record.value(field), field, options),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: or_default(&record.full_name(), "Unknown Client"),
            email: or_default(record.value("email"), "No email provided"),
            completeness: completeness(record),
            sections,
        }
    }
}

/// `mailto:` link for a record, when its email looks like an address
pub fn mailto_link(record: &ClientRecord) -> Option<String> {
    let email = record.value("email").trim();
    email.contains('@').then(|| format!("mailto:{email}"))
}

/// `tel:` link for a record, when its phone is long enough
pub fn tel_link(record: &ClientRecord) -> Option<String> {
    let phone = record.value("phone").trim();
    (phone.chars().count() >= 7).then(|| format!("tel:{phone}"))
}

fn or_default(value: &str, default: &str) -> String {
    if is_blank(value) {
        default.to_string()
    } else {
        value.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FIELD_COUNT;

    fn ada() -> ClientRecord {
        let profile = "Analytical. ".repeat(20);
        ClientRecord::from_pairs([
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("email", "ada@example.com"),
            ("phone", "+44 20 7946 0000"),
            ("discprofile", profile.as_str()),
        ])
    }

    #[test]
    fn test_list_entry() {
        let entry = ListEntry::new(3, &ada());
        assert_eq!(entry.index, 3);
        assert_eq!(entry.name, "Ada Lovelace");
        assert_eq!(entry.company, "No company");
        assert_eq!(entry.tier(), CompletenessTier::Low);
        assert_eq!(entry.to_string(), "🔴 Ada Lovelace (ada@example.com) - No company [19% complete]");
    }

    #[test]
    fn test_profile_sections() {
        let profile = ProfileView::new(&ada(), &FormatOptions::default());
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.sections.len(), 5);
        let rows: usize = profile.sections.iter().map(|s| s.rows.len()).sum();
        assert_eq!(rows, FIELD_COUNT);

        let disc = &profile.sections[3];
        assert_eq!(disc.category, FieldCategory::Disc);
        assert!(disc.rows[0].value.expanded().is_some());
    }

    #[test]
    fn test_unknown_client_header() {
        let profile = ProfileView::new(&ClientRecord::new(), &FormatOptions::default());
        assert_eq!(profile.name, "Unknown Client");
        assert_eq!(profile.email, "No email provided");
        assert_eq!(profile.completeness, 0.0);
    }

    #[test]
    fn test_contact_links() {
        assert_eq!(mailto_link(&ada()).as_deref(), Some("mailto:ada@example.com"));
        assert_eq!(tel_link(&ada()).as_deref(), Some("tel:+44 20 7946 0000"));
        assert_eq!(mailto_link(&ClientRecord::new()), None);
        assert_eq!(tel_link(&ClientRecord::from_pairs([("phone", "123")])), None);
    }
}
