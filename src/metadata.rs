//! Multi-valued metadata accumulator.
//!
//! [`MetadataMap`] maps a field name to an insertion-ordered list of string
//! values. Keys are unique and keep the order in which they were first added.
//! Values may repeat: three `subject` records are three entries, not one.

use std::fmt;
use std::ops::Index;

/// Separator used when collapsing a multi-valued field into one string.
pub const DEFAULT_JOIN_SEPARATOR: &str = "; ";

/// Ordered field name -> values mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    fields: Vec<(String, Vec<String>)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|(k, _)| k == field)
    }

    /// Append `value` to `field`, creating the field if absent.
    pub fn add(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.position(&field) {
            Some(idx) => self.fields[idx].1.push(value),
            None => self.fields.push((field, vec![value])),
        }
    }

    /// Append every value in order.
    pub fn add_all<I, S>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add(field, value);
        }
    }

    /// Replace all values of a single-valued field (last write wins).
    ///
    /// The field keeps its original position if it already existed.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.position(&field) {
            Some(idx) => self.fields[idx].1 = vec![value],
            None => self.fields.push((field, vec![value])),
        }
    }

    /// Set `field` only when it has no value yet. Returns whether it was set.
    pub fn set_if_absent(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let field = field.into();
        if self.contains(&field) {
            return false;
        }
        self.fields.push((field, vec![value.into()]));
        true
    }

    pub fn contains(&self, field: &str) -> bool {
        self.position(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.position(field).map(|idx| self.fields[idx].1.as_slice())
    }

    /// First value of `field`, if any.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.position(field).map(|idx| self.fields.remove(idx).1)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Union `other` into `self` field by field, concatenating value lists.
    pub fn merge(&mut self, other: MetadataMap) {
        for (field, values) in other.fields {
            match self.position(&field) {
                Some(idx) => self.fields[idx].1.extend(values),
                None => self.fields.push((field, values)),
            }
        }
    }

    /// Distinct values of `field` (first occurrence wins) joined with
    /// `separator`.
    pub fn joined(&self, field: &str, separator: &str) -> Option<String> {
        self.get(field).map(|values| join_distinct(values, separator))
    }

    /// Collapse every field into a single string.
    ///
    /// A field with exactly one distinct value is that value.
    pub fn finalize(&self, separator: &str) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(field, values)| (field.clone(), join_distinct(values, separator)))
            .collect()
    }
}

fn join_distinct(values: &[String], separator: &str) -> String {
    let mut distinct: Vec<&str> = Vec::with_capacity(values.len());
    for value in values {
        if !distinct.contains(&value.as_str()) {
            distinct.push(value);
        }
    }
    distinct.join(separator)
}

impl Index<&str> for MetadataMap {
    type Output = [String];

    fn index(&self, field: &str) -> &[String] {
        self.get(field)
            .unwrap_or_else(|| panic!("no metadata field named {field:?}"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = MetadataMap::new();
        for (k, v) in iter {
            map.add(k, v);
        }
        map
    }
}

impl fmt::Display for MetadataMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, value) in self.finalize(DEFAULT_JOIN_SEPARATOR) {
            writeln!(f, "{field}: {value}")?;
        }
        Ok(())
    }
}

/// JSON shape: a single value is a string, several values are an array.
#[cfg(feature = "cli")]
impl serde::Serialize for MetadataMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, values) in &self.fields {
            match values.as_slice() {
                [single] => map.serialize_entry(field, single)?,
                many => map.serialize_entry(field, many)?,
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_order_and_duplicates() {
        let mut map = MetadataMap::new();
        map.add("subject", "Fiction");
        map.add("author", "Doe, Jane");
        map.add("subject", "Fiction");
        map.add("subject", "Mystery");

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["subject", "author"]);
        assert_eq!(map["subject"], ["Fiction", "Fiction", "Mystery"]);
        assert_eq!(map.first("author"), Some("Doe, Jane"));
    }

    #[test]
    fn test_set_is_last_write_wins() {
        let mut map = MetadataMap::new();
        map.set("title", "Unknown");
        map.add("author", "A");
        map.set("title", "Real Title");

        assert_eq!(map["title"], ["Real Title"]);
        assert_eq!(map.keys().next(), Some("title"));
    }

    #[test]
    fn test_set_if_absent() {
        let mut map = MetadataMap::new();
        assert!(map.set_if_absent("isbn", "123"));
        assert!(!map.set_if_absent("isbn", "456"));
        assert_eq!(map["isbn"], ["123"]);
    }

    #[test]
    fn test_merge_concatenates() {
        let mut a: MetadataMap = [("author", "A"), ("title", "T")].into_iter().collect();
        let b: MetadataMap = [("author", "B"), ("size", "10")].into_iter().collect();
        a.merge(b);

        assert_eq!(a["author"], ["A", "B"]);
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["author", "title", "size"]);
    }

    #[test]
    fn test_finalize_dedups_and_joins() {
        let map: MetadataMap = [
            ("subject", "Fiction"),
            ("subject", "Mystery"),
            ("subject", "Fiction"),
            ("title", "Only"),
        ]
        .into_iter()
        .collect();

        let finalized = map.finalize(DEFAULT_JOIN_SEPARATOR);
        assert_eq!(
            finalized,
            vec![
                ("subject".to_string(), "Fiction; Mystery".to_string()),
                ("title".to_string(), "Only".to_string()),
            ]
        );
        assert_eq!(map.finalize(", ")[0].1, "Fiction, Mystery");
        assert_eq!(map.joined("subject", " / ").as_deref(), Some("Fiction / Mystery"));
        assert_eq!(map.joined("missing", "; "), None);
    }

    #[test]
    fn test_remove() {
        let mut map: MetadataMap = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(map.remove("a"), Some(vec!["1".to_string()]));
        assert!(!map.contains("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    #[should_panic(expected = "no metadata field")]
    fn test_index_missing_field_panics() {
        let map = MetadataMap::new();
        let _ = &map["missing"];
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_serialize_single_and_multi() {
        let map: MetadataMap = [("title", "T"), ("author", "A"), ("author", "B")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"title":"T","author":["A","B"]}"#);
    }
}
