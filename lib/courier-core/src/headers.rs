//! Case-insensitive, insertion-ordered header bag.

/// Header name/value pairs with HTTP name semantics.
///
/// Names compare ASCII-case-insensitively; inserting a name that is already
/// present replaces its value in place, so the later value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets a header, replacing any value stored under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Header value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Overlays `later` on top of `self`; colliding names take the later value.
    #[must_use]
    pub fn merged(mut self, later: Self) -> Self {
        self.extend(later);
        self
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/json");
        headers.insert("content-type", "text/plain");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        // first spelling is kept
        assert_eq!(headers.iter().next(), Some(("Content-Type", "text/plain")));
    }

    #[test]
    fn merged_later_wins() {
        let defaults: Headers = [("Content-Type", "application/json"), ("Authorization", "abc")]
            .into_iter()
            .collect();
        let caller: Headers = [("authorization", "xyz"), ("X-Trace", "1")]
            .into_iter()
            .collect();

        let merged = defaults.merged(caller);

        assert_eq!(merged.get("Authorization"), Some("xyz"));
        assert_eq!(merged.get("Content-Type"), Some("application/json"));
        assert_eq!(merged.get("x-trace"), Some("1"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn remove_header() {
        let mut headers: Headers = [("Authorization", "abc")].into_iter().collect();
        assert_eq!(headers.remove("authorization").as_deref(), Some("abc"));
        assert!(headers.is_empty());
        assert!(headers.remove("authorization").is_none());
    }
}
