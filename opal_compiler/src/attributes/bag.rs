//! Ordered attribute storage shared by both attribute syntaxes
//!
//! Named entries come from v1 groups (`[name=value]`); positional slots from
//! v2 groups (`[v0:v1:v2]`) are stored under synthetic `_pos<N>` keys so one
//! structure serves both. Insertion order is preserved and duplicate keys are
//! allowed; lookups return the first match.

use serde::{Deserialize, Serialize};

/// Synthetic key for the nth positional slot
pub fn positional_key(index: usize) -> String {
    format!("_pos{}", index)
}

/// Synthetic key recording the total positional slot count
pub const POS_COUNT_KEY: &str = "_posCount";

/// Ordered multi-map of attribute entries for one tag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeBag {
    entries: Vec<(String, String)>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; existing entries with the same key are kept
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Replace the first entry with this key, or append if absent
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// First value stored under a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All values stored under a key, in insertion order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value of the nth positional slot
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.get(&positional_key(index))
    }

    /// Number of positional slots stored; prefers the recorded `_posCount`
    /// and falls back to counting `_pos<N>` entries
    pub fn positional_count(&self) -> usize {
        if let Some(count) = self.get(POS_COUNT_KEY).and_then(|v| v.parse().ok()) {
            return count;
        }
        self.entries
            .iter()
            .filter(|(k, _)| {
                k.strip_prefix("_pos")
                    .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_first_match() {
        let mut bag = AttributeBag::new();
        bag.insert("name", "First");
        bag.insert("name", "Second");
        assert_eq!(bag.get("name"), Some("First"));
        assert_eq!(bag.get_all("name").collect::<Vec<_>>(), vec![
            "First", "Second"
        ]);
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_positional_slots() {
        let mut bag = AttributeBag::new();
        bag.insert(positional_key(0), "f1");
        bag.insert(positional_key(1), "Main");
        bag.insert("vis", "pub");
        assert_eq!(bag.positional(0), Some("f1"));
        assert_eq!(bag.positional(1), Some("Main"));
        assert_eq!(bag.positional(2), None);
        assert_eq!(bag.positional_count(), 2);
    }

    #[test]
    fn test_pos_count_key_wins_over_counting() {
        let mut bag = AttributeBag::new();
        bag.insert(positional_key(0), "a");
        bag.set(POS_COUNT_KEY, "1");
        assert_eq!(bag.positional_count(), 1);
        bag.insert(positional_key(1), "b");
        bag.set(POS_COUNT_KEY, "2");
        assert_eq!(bag.positional_count(), 2);
        // The count key itself is not a slot
        assert_eq!(bag.get_all(POS_COUNT_KEY).count(), 1);
    }

    #[test]
    fn test_missing_key() {
        let bag = AttributeBag::new();
        assert_eq!(bag.get("id"), None);
        assert!(!bag.has("id"));
        assert!(bag.is_empty());
    }
}
