use indexmap::IndexMap;
use serde::Serialize;

/// One flattened `<item>`: column name to value, in column insertion order.
///
/// A `None` value is the null marker written by the reconciler for columns a
/// given item does not have. Serializes as a map with `null` for the marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Option<String>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. An existing key keeps its position.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), Some(value.into()));
    }

    /// Sets `key` to the null marker. An existing key keeps its position.
    pub fn insert_null<K: Into<String>>(&mut self, key: K) {
        self.0.insert(key.into(), None);
    }

    /// Returns the raw entry: `None` when the column is missing,
    /// `Some(None)` when it holds the null marker.
    pub fn get(&self, key: &str) -> Option<&Option<String>> {
        self.0.get(key)
    }

    /// Returns the column value, `None` when missing or null.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Option::as_deref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, Option<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Record;

    #[test]
    fn insert_should_keep_first_position_and_last_value() {
        let mut record = Record::new();
        record.insert("status", "draft");
        record.insert("title", "Hello");
        record.insert("status", "publish");

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["status", "title"]);
        assert_eq!(record.value("status"), Some("publish"));
    }

    #[test]
    fn null_marker_should_differ_from_missing_key() {
        let mut record = Record::new();
        record.insert_null("category_tag");

        assert_eq!(record.get("category_tag"), Some(&None));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.value("category_tag"), None);
        assert!(record.contains_key("category_tag"));
    }

    #[test]
    fn record_should_serialize_as_ordered_map() {
        let mut record = Record::new();
        record.insert("title", "Hello");
        record.insert_null("guid");

        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(json, r#"{"title":"Hello","guid":null}"#);
    }
}
