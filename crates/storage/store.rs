//! `EntryStore`: the plain-data entry map shared by the in-memory engine,
//! its snapshots, and the overlay wrapper's write layer. Pulling this out
//! of `InMemoryEngine` itself means the ordering/prefix rules (§4.5) are
//! implemented exactly once and reused by every in-memory-shaped view
//! rather than re-derived per caller.

use crate::bytes::to_hex_key;
use crate::engine::{Entry, Snapshot, Value};
use crate::error::DbError;
use crate::ordering;
use std::collections::BTreeMap;

/// A key/value map indexed by the engine-internal hex form of the key
/// (§3), with the byte-order-aware enumeration and seek/next rules (§4.5)
/// layered on top.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    by_hex: BTreeMap<String, Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_hex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hex.is_empty()
    }

    pub fn get(&self, key: &[u8]) -> Option<Value> {
        self.by_hex.get(&to_hex_key(key)).map(|(_, v)| v.clone())
    }

    pub fn has(&self, key: &[u8]) -> bool {
        self.by_hex.contains_key(&to_hex_key(key))
    }

    /// Clones `key`/`value` on ingress, per the clone-on-put discipline
    /// (§3, §9): the caller's buffers stay independent of stored data.
    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.by_hex
            .insert(to_hex_key(key), (key.to_vec(), value.to_vec()));
    }

    /// Idempotent: removing an absent key is not an error (§4.2).
    pub fn remove(&mut self, key: &[u8]) {
        self.by_hex.remove(&to_hex_key(key));
    }

    pub fn clear(&mut self) {
        self.by_hex.clear();
    }

    /// Any permutation of the stored entries is a conforming "unordered"
    /// view (§3); iterating the hex-keyed map is one such permutation.
    pub fn entries_unordered(&self) -> Vec<Entry> {
        self.by_hex.values().cloned().collect()
    }

    /// Sorted by the byte order in §3, including its longer-prefix tie
    /// break. This is a fresh sort on every call (no persistent ordered
    /// index); callers that want to avoid repeated sorts should cache the
    /// result and invalidate it on mutation, as [`super::backend::in_memory::InMemoryEngine`]
    /// does.
    pub fn entries_ordered(&self) -> Vec<Entry> {
        let mut entries = self.entries_unordered();
        ordering::sort_by_key_order(&mut entries);
        entries
    }

    pub fn seek(&self, key: &[u8], prefix: Option<&[u8]>) -> Option<Entry> {
        ordering::seek(&self.entries_ordered(), key, prefix)
    }

    pub fn next(&self, key: &[u8], prefix: Option<&[u8]>) -> Option<Entry> {
        ordering::next(&self.entries_ordered(), key, prefix)
    }

    pub fn range(&self, prefix: Option<&[u8]>) -> Vec<Entry> {
        ordering::range(&self.entries_ordered(), prefix)
    }

    /// Overlays `other` atop `self`: entries in `other` replace entries
    /// with the same key in `self` (§4.6's overlay-union rule), used by
    /// the overlay wrapper's combined read view.
    pub fn union_shadowed_by(&self, other: &EntryStore) -> EntryStore {
        let mut merged = self.clone();
        for (key, value) in other.entries_unordered() {
            merged.put(&key, &value);
        }
        merged
    }
}

/// An `EntryStore` frozen at acquisition time is itself a conforming
/// [`Snapshot`] (§4.3, §4.6): both the in-memory engine and the overlay
/// wrapper hand out one directly rather than wrapping it in a second type.
impl Snapshot for EntryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Value>, DbError> {
        Ok(EntryStore::get(self, key))
    }

    fn get_all(&self, ordered: bool) -> Result<Vec<Entry>, DbError> {
        Ok(if ordered {
            self.entries_ordered()
        } else {
            self.entries_unordered()
        })
    }

    fn seek(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(EntryStore::seek(self, key, prefix))
    }

    fn next(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(EntryStore::next(self, key, prefix))
    }

    fn range(&self, prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError> {
        Ok(EntryStore::range(self, prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let mut store = EntryStore::new();
        store.put(b"k", b"v");
        assert_eq!(store.get(b"k"), Some(b"v".to_vec()));
        assert!(store.has(b"k"));
    }

    #[test]
    fn remove_is_idempotent_and_clears_observability() {
        let mut store = EntryStore::new();
        store.put(b"k", b"v");
        store.remove(b"k");
        store.remove(b"k");
        assert_eq!(store.get(b"k"), None);
        assert!(!store.has(b"k"));
    }

    #[test]
    fn scenario_8_order_under_the_byte_tie_break() {
        let mut store = EntryStore::new();
        store.put(&[0x01], &[0x11]);
        store.put(&[0x01, 0x00], &[0x22]);
        let keys: Vec<_> = store
            .entries_ordered()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![vec![0x01, 0x00], vec![0x01]]);
    }

    #[test]
    fn union_shadowed_by_prefers_the_overlay_value() {
        let mut base = EntryStore::new();
        base.put(b"k", b"base");
        let mut overlay = EntryStore::new();
        overlay.put(b"k", b"overlay");
        let merged = base.union_shadowed_by(&overlay);
        assert_eq!(merged.get(b"k"), Some(b"overlay".to_vec()));
    }
}
