//! Header key normalization and an ordered header map.
//!
//! Callers may spell a header either the way it appears on the wire
//! (`"Content-Type"`) or as an identifier (`"content_type"`). Both forms are
//! folded into one key: underscores become hyphens and the result is
//! lowercased. Every lookup and insert goes through the same rule, so
//! `get("Content_Type")` finds a header stored as `"content-type"`.

/// Canonical form of a header name: trimmed, `_` replaced by `-`, lowercase.
pub fn normalize_header_name(name: &str) -> String {
    name.trim().replace('_', "-").to_ascii_lowercase()
}

/// Insertion-ordered header map keyed by normalized header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = normalize_header_name(name);
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`, replacing any existing value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = normalize_header_name(name);
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Set `name` to `value` only if no value is present yet.
    ///
    /// Returns `true` when the value was inserted.
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((normalize_header_name(name), value.into()));
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = normalize_header_name(name);
        let index = self.entries.iter().position(|(key, _)| *key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for Headers {
    /// Later entries replace earlier ones with the same normalized name.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name.as_ref(), value);
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

impl IntoIterator for Headers {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
