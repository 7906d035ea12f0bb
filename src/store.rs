//! Backing store: the small trait the spelling table is built on top
//! of, plus an in-memory reference implementation. The real on-disk B-tree
//! engine is out of scope for this crate; the in-memory store lets the
//! rest of the subsystem (and its tests) run standalone.

use crate::error::SpellingError;
use std::collections::BTreeMap;

pub trait BackingStore {
    fn get_exact_entry(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn add(&mut self, key: &[u8], value: &[u8]);
    fn del(&mut self, key: &[u8]);
    fn is_modified(&self) -> bool;
    fn flush_db(&mut self) -> Result<(), SpellingError>;
    fn cancel(&mut self);
    /// Iterates all entries whose key starts with `prefix`, in key order —
    /// needed by the fragment indexes to probe ranges of generated keys.
    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// An in-memory stand-in for the brass B-tree table. Keys are ordered
/// lexicographically by byte value, same ordering the real backing store
/// guarantees for range scans.
#[derive(Default)]
pub struct MemoryStore {
    committed: BTreeMap<Vec<u8>, Vec<u8>>,
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl BackingStore for MemoryStore {
    fn get_exact_entry(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(Some(v)) => Some(v.clone()),
            Some(None) => None,
            None => self.committed.get(key).cloned(),
        }
    }

    fn add(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn del(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), None);
    }

    fn is_modified(&self) -> bool {
        !self.pending.is_empty()
    }

    fn flush_db(&mut self) -> Result<(), SpellingError> {
        for (key, value) in self.pending.drain() {
            match value {
                Some(v) => {
                    self.committed.insert(key, v);
                }
                None => {
                    self.committed.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn cancel(&mut self) {
        self.pending.clear();
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Option<Vec<u8>>> = BTreeMap::new();
        for (k, v) in self.committed.range(prefix.to_vec()..) {
            if !k.starts_with(prefix) {
                break;
            }
            merged.insert(k.clone(), Some(v.clone()));
        }
        for (k, v) in self.pending.range(prefix.to_vec()..) {
            if !k.starts_with(prefix) {
                break;
            }
            merged.insert(k.clone(), v.clone());
        }
        merged
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test0001_add_then_flush_visible() {
        let mut store = MemoryStore::new();
        store.add(b"Wfoo", b"1");
        assert!(store.is_modified());
        store.flush_db().unwrap();
        assert!(!store.is_modified());
        assert_eq!(store.get_exact_entry(b"Wfoo"), Some(b"1".to_vec()));
    }

    #[test]
    fn test0002_cancel_discards_pending() {
        let mut store = MemoryStore::new();
        store.add(b"Wfoo", b"1");
        store.cancel();
        assert_eq!(store.get_exact_entry(b"Wfoo"), None);
    }

    #[test]
    fn test0003_del_overrides_committed() {
        let mut store = MemoryStore::new();
        store.add(b"Wfoo", b"1");
        store.flush_db().unwrap();
        store.del(b"Wfoo");
        assert_eq!(store.get_exact_entry(b"Wfoo"), None);
        store.flush_db().unwrap();
        assert_eq!(store.get_exact_entry(b"Wfoo"), None);
    }

    #[test]
    fn test0004_iter_prefix() {
        let mut store = MemoryStore::new();
        store.add(b"Wfoo", b"1");
        store.add(b"Wbar", b"2");
        store.add(b"Xbaz", b"3");
        store.flush_db().unwrap();
        let mut results = store.iter_prefix(b"W");
        results.sort();
        assert_eq!(results.len(), 2);
    }
}
