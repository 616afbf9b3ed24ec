//! Client record type

use crate::error::{Error, Result};
use crate::field::{field_index, field_names, is_blank, FIELD_COUNT};

/// One client: exactly one text value per schema field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientRecord {
    values: Vec<String>,
}

impl ClientRecord {
    /// Create a record with every field empty
    pub fn new() -> Self {
        Self {
            values: vec![String::new(); FIELD_COUNT],
        }
    }

    /// Build a record from values in canonical field order.
    ///
    /// Missing trailing values are empty; surplus values are dropped.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = values.into_iter().take(FIELD_COUNT).map(Into::into).collect();
        values.resize(FIELD_COUNT, String::new());
        Self { values }
    }

    /// Build a record from `(field, value)` pairs, ignoring unknown fields
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            if let Some(idx) = field_index(key.as_ref()) {
                record.values[idx] = value.into();
            }
        }
        record
    }

    /// Get a field value by name
    pub fn get(&self, field: &str) -> Option<&str> {
        field_index(field).map(|idx| self.values[idx].as_str())
    }

    /// Get a field value by name, empty string for unknown fields
    pub fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Set a field value by name
    pub fn set<S: Into<String>>(&mut self, field: &str, value: S) -> Result<()> {
        let idx = field_index(field).ok_or_else(|| Error::UnknownField(field.to_string()))?;
        self.values[idx] = value.into();
        Ok(())
    }

    /// Get a value by canonical position
    pub fn value_at(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> &mut String {
        &mut self.values[index]
    }

    /// Values in canonical field order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterate `(field, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        field_names().zip(self.values.iter().map(String::as_str))
    }

    /// Full name: the stored value, or first + last when not supplied
    pub fn full_name(&self) -> String {
        let stored = self.value("full_name");
        if !is_blank(stored) {
            return stored.trim().to_string();
        }
        let first = self.value("first_name");
        let last = self.value("last_name");
        [first, last]
            .iter()
            .filter(|v| !is_blank(v))
            .map(|v| v.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fill `full_name` from first + last when it is blank
    pub fn derive_full_name(&mut self) {
        if is_blank(self.value("full_name")) {
            let derived = self.full_name();
            if let Some(idx) = field_index("full_name") {
                self.values[idx] = derived;
            }
        }
    }

    /// Whether every field is blank
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| is_blank(v))
    }
}

impl Default for ClientRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use crate::field::FIELDS;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for ClientRecord {
        fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
            for (spec, value) in FIELDS.iter().zip(&self.values) {
                map.serialize_entry(spec.name, value)?;
            }
            map.end()
        }
    }

    struct RecordVisitor;

    impl<'de> Visitor<'de> for RecordVisitor {
        type Value = ClientRecord;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a map of client field names to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
            let mut record = ClientRecord::new();
            while let Some(key) = access.next_key::<String>()? {
                let value: Option<loose::Loose> = access.next_value()?;
                if let Some(idx) = field_index(&key) {
                    record.values[idx] = value.map(|v| v.0).unwrap_or_default();
                }
            }
            Ok(record)
        }
    }

    impl<'de> Deserialize<'de> for ClientRecord {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
            deserializer.deserialize_map(RecordVisitor)
        }
    }

    /// Accepts strings, numbers and booleans as field text
    mod loose {
        use serde::de::{self, Deserializer, Visitor};
        use serde::Deserialize;

        pub struct Loose(pub String);

        impl<'de> Deserialize<'de> for Loose {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct LooseVisitor;

                impl<'de> Visitor<'de> for LooseVisitor {
                    type Value = Loose;

                    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                        f.write_str("a string, number or boolean")
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<Loose, E> {
                        Ok(Loose(v.to_string()))
                    }

                    fn visit_string<E: de::Error>(self, v: String) -> Result<Loose, E> {
                        Ok(Loose(v))
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Loose, E> {
                        Ok(Loose(v.to_string()))
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Loose, E> {
                        Ok(Loose(v.to_string()))
                    }

                    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Loose, E> {
                        Ok(Loose(v.to_string()))
                    }

                    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Loose, E> {
                        Ok(Loose(v.to_string()))
                    }
                }

                deserializer.deserialize_any(LooseVisitor)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_blank() {
        let record = ClientRecord::new();
        assert_eq!(record.values().len(), FIELD_COUNT);
        assert!(record.is_blank());
    }

    #[test]
    fn test_get_set() {
        let mut record = ClientRecord::new();
        record.set("email", "a@b.co").unwrap();
        assert_eq!(record.get("email"), Some("a@b.co"));
        assert_eq!(record.get("nope"), None);
        assert_eq!(record.set("nope", "x"), Err(Error::UnknownField("nope".into())));
    }

    #[test]
    fn test_from_values_pads_and_truncates() {
        let record = ClientRecord::from_values(["Ada", "Lovelace"]);
        assert_eq!(record.value("last_name"), "Lovelace");
        assert_eq!(record.value("email"), "");

        let long: Vec<String> = (0..40).map(|i| i.to_string()).collect();
        let record = ClientRecord::from_values(long);
        assert_eq!(record.values().len(), FIELD_COUNT);
    }

    #[test]
    fn test_full_name_derivation() {
        let mut record = ClientRecord::from_pairs([("first_name", "Ada"), ("last_name", "Lovelace")]);
        assert_eq!(record.full_name(), "Ada Lovelace");
        record.derive_full_name();
        assert_eq!(record.value("full_name"), "Ada Lovelace");

        let record = ClientRecord::from_pairs([("first_name", "Ada"), ("last_name", "nan")]);
        assert_eq!(record.full_name(), "Ada");

        let record = ClientRecord::from_pairs([("first_name", "Ada"), ("full_name", "Countess Lovelace")]);
        assert_eq!(record.full_name(), "Countess Lovelace");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_shape() {
        let record = ClientRecord::from_pairs([("email", "a@b.co"), ("postal_code", "02139")]);
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FIELD_COUNT);
        assert_eq!(obj["email"], "a@b.co");

        let back: ClientRecord =
            serde_json::from_str(r#"{"email":"x@y.io","postal_code":2139,"extra":"ignored","ip":null}"#).unwrap();
        assert_eq!(back.value("email"), "x@y.io");
        assert_eq!(back.value("postal_code"), "2139");
        assert_eq!(back.value("ip"), "");
    }
}
