use std::collections::BTreeMap;

/// An ordered key/value mapping produced by the query serializers.
///
/// Keys come from the fixed parameter vocabulary; values are already
/// stringified. Empty and literal-zero values are dropped on insertion, so a
/// rendered query string never carries explicit empties and stays stable for
/// caching. Iteration order is the key order, which keeps encoded output
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm(BTreeMap<&'static str, String>);

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, dropping it when empty or `"0"`.
    pub fn set(&mut self, key: &'static str, value: String) {
        if value.is_empty() || value == "0" {
            return;
        }
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Render as a percent-encoded query string, without a leading `?`.
    pub fn encode(&self) -> String {
        let mut encoded = String::new();
        for (key, value) in &self.0 {
            if !encoded.is_empty() {
                encoded.push('&');
            }
            encoded.push_str(key);
            encoded.push('=');
            encoded.push_str(&urlencoding::encode(value));
        }
        encoded
    }
}
