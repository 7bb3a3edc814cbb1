//! Key-value storage exposed to contracts
//!
//! Contracts see a flat string -> string store. Writes made during a
//! call go to a [`WriteBuffer`] and only reach the contract's
//! [`MemoryStore`] once the call has succeeded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-keyed storage interface
pub trait KeyValueStore {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&mut self, key: &str, value: &str);

    /// Read a value, falling back to `default` when absent
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Check if a key is present
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// In-memory store (ordered so snapshots are deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries whose key starts with `prefix`
    pub fn scan_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a String)> + 'a {
        self.entries
            .range(prefix.to_string()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
    }

    /// Apply a set of committed writes
    pub fn apply(&mut self, changes: BTreeMap<String, String>) {
        self.entries.extend(changes);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Pending writes layered over a read-only base store
pub struct WriteBuffer<'a, S: KeyValueStore + ?Sized> {
    base: &'a S,
    pending: BTreeMap<String, String>,
}

impl<'a, S: KeyValueStore + ?Sized> WriteBuffer<'a, S> {
    /// Create an empty buffer over `base`
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            pending: BTreeMap::new(),
        }
    }

    /// Consume the buffer, returning the writes to commit
    pub fn into_changes(self) -> BTreeMap<String, String> {
        self.pending
    }
}

impl<'a, S: KeyValueStore + ?Sized> KeyValueStore for WriteBuffer<'a, S> {
    fn get(&self, key: &str) -> Option<String> {
        self.pending
            .get(key)
            .cloned()
            .or_else(|| self.base.get(key))
    }

    fn set(&mut self, key: &str, value: &str) {
        self.pending.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_default() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_or_default("BALANCE_Abob", "0"), "0");

        store.set("BALANCE_Abob", "7");
        assert_eq!(store.get_or_default("BALANCE_Abob", "0"), "7");
        assert!(store.contains("BALANCE_Abob"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_scan_prefix() {
        let mut store = MemoryStore::new();
        store.set("ALLOW_Abob", "1");
        store.set("BALANCE_Abob", "2");
        store.set("BALANCE_Adave", "3");
        store.set("NAME", "x");

        let balances: Vec<_> = store.scan_prefix("BALANCE_").collect();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].0, "BALANCE_Abob");
    }

    #[test]
    fn test_write_buffer_isolation() {
        let mut store = MemoryStore::new();
        store.set("a", "1");

        let mut buffer = WriteBuffer::new(&store);
        buffer.set("a", "2");
        buffer.set("b", "3");

        // Reads see pending writes first
        assert_eq!(buffer.get("a").as_deref(), Some("2"));
        assert_eq!(buffer.get("b").as_deref(), Some("3"));

        let changes = buffer.into_changes();
        assert_eq!(changes.len(), 2);
        // Base untouched until commit
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.apply(changes);
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.get("b").as_deref(), Some("3"));
    }

    #[test]
    fn test_discarded_buffer() {
        let store = MemoryStore::new();
        {
            let mut buffer = WriteBuffer::new(&store);
            buffer.set("x", "1");
        }
        assert!(store.is_empty());
    }
}
