//! Completeness scoring

use crate::field::{is_blank, FIELD_COUNT};
use crate::record::ClientRecord;

/// Percentage (0..=100) of schema fields holding a non-blank value
pub fn completeness(record: &ClientRecord) -> f64 {
    let filled = record.values().iter().filter(|v| !is_blank(v)).count();
    filled as f64 / FIELD_COUNT as f64 * 100.0
}

/// Coarse completeness band used for list markers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessTier {
    /// 80% and above
    High,
    /// 50% up to 80%
    Medium,
    /// Below 50%
    Low,
}

impl CompletenessTier {
    /// Band for a completeness percentage
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            CompletenessTier::High
        } else if percent >= 50.0 {
            CompletenessTier::Medium
        } else {
            CompletenessTier::Low
        }
    }

    /// Status marker shown in list views
    pub fn marker(self) -> &'static str {
        match self {
            CompletenessTier::High => "🟢",
            CompletenessTier::Medium => "🟡",
            CompletenessTier::Low => "🔴",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field_names;
    use proptest::prelude::*;

    #[test]
    fn test_empty_record_scores_zero() {
        assert_eq!(completeness(&ClientRecord::new()), 0.0);
        let sentinels = ClientRecord::from_values(std::iter::repeat("NaN").take(FIELD_COUNT));
        assert_eq!(completeness(&sentinels), 0.0);
    }

    #[test]
    fn test_full_record_scores_hundred() {
        let record = ClientRecord::from_pairs(field_names().map(|f| (f, "value")));
        assert_eq!(completeness(&record), 100.0);
    }

    #[test]
    fn test_partial_record() {
        let record = ClientRecord::from_pairs([("first_name", "Ada"), ("email", "null"), ("city", "London")]);
        let expected = 2.0 / FIELD_COUNT as f64 * 100.0;
        assert!((completeness(&record) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(CompletenessTier::from_percent(100.0), CompletenessTier::High);
        assert_eq!(CompletenessTier::from_percent(80.0), CompletenessTier::High);
        assert_eq!(CompletenessTier::from_percent(79.9), CompletenessTier::Medium);
        assert_eq!(CompletenessTier::from_percent(50.0), CompletenessTier::Medium);
        assert_eq!(CompletenessTier::from_percent(0.0), CompletenessTier::Low);
    }

    proptest! {
        #[test]
        fn prop_score_in_range_and_stable(values in proptest::collection::vec("(nan|null|[a-z ]{0,6})", FIELD_COUNT)) {
            let record = ClientRecord::from_values(values);
            let first = completeness(&record);
            prop_assert!((0.0..=100.0).contains(&first));
            prop_assert_eq!(first, completeness(&record));
        }
    }
}
