//! The fixed client field table
//!
//! Every screen, export and worksheet row uses the same 27 fields in the
//! same order. Each field belongs to one [`FieldCategory`] and has a
//! [`FieldKind`] that drives cleaning and display.

/// Number of fields in the client schema
pub const FIELD_COUNT: usize = 27;

/// Display grouping of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    /// Name, contact and origin details
    Personal,
    /// Postal address
    Address,
    /// Company reference
    Company,
    /// DISC behavioral assessment narratives
    Disc,
    /// HR and coaching narratives
    HrDevelopment,
}

impl FieldCategory {
    /// All categories in display order
    pub const ALL: [FieldCategory; 5] = [
        FieldCategory::Personal,
        FieldCategory::Address,
        FieldCategory::Company,
        FieldCategory::Disc,
        FieldCategory::HrDevelopment,
    ];

    /// Section heading
    pub fn label(self) -> &'static str {
        match self {
            FieldCategory::Personal => "Personal Information",
            FieldCategory::Address => "Address Information",
            FieldCategory::Company => "Company Information",
            FieldCategory::Disc => "DISC Profiles",
            FieldCategory::HrDevelopment => "HR & Development",
        }
    }

    /// Fields of this category, in display order
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            FieldCategory::Personal => &[
                "first_name",
                "last_name",
                "full_name",
                "email",
                "phone",
                "date_of_birth",
                "timezone",
                "ip",
                "source",
            ],
            FieldCategory::Address => &[
                "address_line_1",
                "address_line_2",
                "city",
                "state",
                "postal_code",
                "country",
            ],
            FieldCategory::Company => &["company_id"],
            FieldCategory::Disc => &[
                "discprofile",
                "discsales",
                "disc_communiction",
                "leadership_style",
                "team_dynamics",
                "conflict_resolution",
                "customer_service_approach",
                "decision_making_style",
                "workplace_behavior",
            ],
            FieldCategory::HrDevelopment => &["hiring_and_recruitment", "_coaching_and_development"],
        }
    }
}

/// How a field's value is cleaned and displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// First, last or full name: title-cased
    Name,
    /// Email address: lower-cased and pattern-checked
    Email,
    /// Phone number: length-checked
    Phone,
    /// Birth date: parsed and normalised
    BirthDate,
    /// Address component: title-cased for display
    Address,
    /// Long free text, truncated only for display
    Narrative,
    /// Anything else, shown as-is
    Plain,
}

/// One entry of the field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name as it appears in the worksheet header
    pub name: &'static str,
    /// Display grouping
    pub category: FieldCategory,
    /// Cleaning/display behavior
    pub kind: FieldKind,
}

const fn spec(name: &'static str, category: FieldCategory, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        category,
        kind,
    }
}

use FieldCategory as C;
use FieldKind as K;

/// The client schema in canonical column order
pub static FIELDS: [FieldSpec; FIELD_COUNT] = [
    spec("first_name", C::Personal, K::Name),
    spec("last_name", C::Personal, K::Name),
    spec("full_name", C::Personal, K::Name),
    spec("email", C::Personal, K::Email),
    spec("timezone", C::Personal, K::Plain),
    spec("address_line_1", C::Address, K::Address),
    spec("address_line_2", C::Address, K::Address),
    spec("city", C::Address, K::Address),
    spec("state", C::Address, K::Address),
    spec("postal_code", C::Address, K::Plain),
    spec("country", C::Address, K::Address),
    spec("ip", C::Personal, K::Plain),
    spec("phone", C::Personal, K::Phone),
    spec("source", C::Personal, K::Plain),
    spec("date_of_birth", C::Personal, K::BirthDate),
    spec("company_id", C::Company, K::Plain),
    spec("discprofile", C::Disc, K::Narrative),
    spec("discsales", C::Disc, K::Narrative),
    spec("disc_communiction", C::Disc, K::Narrative),
    spec("leadership_style", C::Disc, K::Narrative),
    spec("team_dynamics", C::Disc, K::Narrative),
    spec("conflict_resolution", C::Disc, K::Narrative),
    spec("customer_service_approach", C::Disc, K::Narrative),
    spec("decision_making_style", C::Disc, K::Narrative),
    spec("workplace_behavior", C::Disc, K::Narrative),
    spec("hiring_and_recruitment", C::HrDevelopment, K::Narrative),
    spec("_coaching_and_development", C::HrDevelopment, K::Narrative),
];

/// Fields the list view can sort by
pub const SORTABLE_FIELDS: [&str; 5] = ["full_name", "email", "company_id", "first_name", "last_name"];

/// Iterate field names in canonical order
pub fn field_names() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.name)
}

/// Position of a field in canonical order
pub fn field_index(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.name == name)
}

/// Look up a field's table entry
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Whether the field holds long free text
pub fn is_narrative(name: &str) -> bool {
    matches!(field_spec(name), Some(f) if f.kind == FieldKind::Narrative)
}

/// Human label for a field name ("date_of_birth" -> "Date Of Birth")
pub fn field_label(name: &str) -> String {
    title_case(name.replace('_', " ").trim())
}

/// Values treated as "no data"
pub const SENTINELS: [&str; 4] = ["", "nan", "none", "null"];

/// Shared empty/sentinel predicate
pub fn is_blank(value: &str) -> bool {
    let v = value.trim();
    SENTINELS.iter().any(|s| v.eq_ignore_ascii_case(s))
}

/// Capitalise the first letter of every word and lower-case the rest.
///
/// A word starts after any non-alphanumeric character, so "o'neil-smith"
/// becomes "O'Neil-Smith".
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut capitalize_next = true;

    for ch in text.chars() {
        if !continues_word(ch) {
            result.push(ch);
            capitalize_next = true;
        } else if capitalize_next {
            // Only the first char of a multi-char expansion stays capital ("ß" -> "Ss")
            let mut upper = ch.to_uppercase();
            if let Some(first) = upper.next() {
                result.push(first);
            }
            result.extend(upper.flat_map(char::to_lowercase));
            capitalize_next = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

// Combining marks belong to the preceding letter; lower-casing "İ" yields one.
fn continues_word(ch: char) -> bool {
    ch.is_alphanumeric() || ('\u{0300}'..='\u{036f}').contains(&ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_consistent_with_categories() {
        let mut grouped: Vec<&str> = FieldCategory::ALL
            .iter()
            .flat_map(|c| c.fields().iter().copied())
            .collect();
        let mut all: Vec<&str> = field_names().collect();
        grouped.sort_unstable();
        all.sort_unstable();
        assert_eq!(grouped, all);

        for category in FieldCategory::ALL {
            for name in category.fields() {
                assert_eq!(field_spec(name).unwrap().category, category, "{name}");
            }
        }
    }

    #[test]
    fn test_narrative_fields() {
        assert_eq!(FIELDS.iter().filter(|f| f.kind == FieldKind::Narrative).count(), 11);
        assert!(is_narrative("discprofile"));
        assert!(is_narrative("_coaching_and_development"));
        assert!(!is_narrative("email"));
        assert!(!is_narrative("bogus"));
    }

    #[test]
    fn test_field_label() {
        assert_eq!(field_label("date_of_birth"), "Date Of Birth");
        assert_eq!(field_label("_coaching_and_development"), "Coaching And Development");
        assert_eq!(field_label("ip"), "Ip");
    }

    #[test]
    fn test_is_blank() {
        for v in ["", "  ", "nan", "NaN", "None", "NULL", " null "] {
            assert!(is_blank(v), "{v:?}");
        }
        assert!(!is_blank("0"));
        assert!(!is_blank("Nancy"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jOHN"), "John");
        assert_eq!(title_case("mary ann"), "Mary Ann");
        assert_eq!(title_case("o'neil-smith"), "O'Neil-Smith");
        assert_eq!(title_case("123 main st"), "123 Main St");
    }

    #[test]
    fn test_title_case_non_ascii() {
        assert_eq!(title_case("ßimon"), "Ssimon");
        assert_eq!(title_case("élodie dupré"), "Élodie Dupré");
        for input in ["ßimon", "SSimon", "aİb", "ﬁona"] {
            let once = title_case(input);
            assert_eq!(title_case(&once), once, "input {input:?}");
        }
    }
}
