//! Profile entries: the output fields recorded for one grapheme.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A raw profile record as read from a table: field name to optional value.
///
/// Records carry the grapheme column alongside the output fields. Field order
/// is the insertion order of the underlying [`IndexMap`].
pub type Record = IndexMap<String, Option<String>>;

/// Output fields of a single grapheme, in a stable field order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry {
    fields: IndexMap<String, Option<String>>,
}

impl Entry {
    /// Create an entry without fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entry with every given field set to "no value".
    pub fn empty<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            fields: fields.into_iter().map(|f| (f.to_string(), None)).collect(),
        }
    }

    /// Get the value of a field; `None` for missing fields and "no value".
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Returns true if the entry has the field, with or without a value.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set a field, adding it if missing.
    pub fn set(&mut self, field: impl Into<String>, value: Option<String>) {
        self.fields.insert(field.into(), value);
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the entry has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<IndexMap<String, Option<String>>> for Entry {
    fn from(fields: IndexMap<String, Option<String>>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fields() {
        let mut entry = Entry::empty(["IPA", "SCA"]);
        assert!(entry.has_field("IPA"));
        assert_eq!(entry.get("IPA"), None);

        entry.set("IPA", Some("tʰ".to_string()));
        entry.set("FREQUENCY", Some("3".to_string()));
        assert_eq!(entry.get("IPA"), Some("tʰ"));
        assert_eq!(
            entry.field_names().collect::<Vec<_>>(),
            vec!["IPA", "SCA", "FREQUENCY"]
        );
    }
}
