//! Insertion-ordered line item map

/// Line items keyed by name, iterated in insertion order
///
/// Re-inserting an existing name replaces its value in place, so the row
/// keeps the position of its first insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItems<T> {
    entries: Vec<(String, T)>,
}

impl<T> LineItems<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or overwrite; returns the previous value for `name`
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.0 == name) {
            Some(std::mem::replace(&mut entry.1, value))
        } else {
            self.entries.push((name, value));
            None
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.0 == name).map(|e| &e.1)
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.0 == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<T> Default for LineItems<T> {
    fn default() -> Self {
        Self::new()
    }
}
