//! The contract-complete reference engine (C5, §4.3): entries held in an
//! [`EntryStore`](crate::store::EntryStore) behind a lock, read/write
//! counters, and an unordered/ordered materialization cache invalidated on
//! every mutation.

use crate::catalog::DbName;
use crate::engine::{BatchOp, Entry, Key, KvEngine, Snapshot, Value, WriteBatch};
use crate::error::DbError;
use crate::flags::{ReadFlags, WriteFlags};
use crate::metric::{Counters, DbMetric};
use crate::store::EntryStore;
use std::sync::{Mutex, RwLock};
use tracing::{debug, trace, warn};

#[derive(Debug, Default)]
struct Cache {
    unordered: Option<Vec<Entry>>,
    ordered: Option<Vec<Entry>>,
}

#[derive(Debug)]
pub struct InMemoryEngine {
    name: DbName,
    store: RwLock<EntryStore>,
    counters: Counters,
    cache: Mutex<Cache>,
}

impl InMemoryEngine {
    pub fn new(name: DbName) -> Self {
        debug!(db = %name, "constructing in-memory engine");
        Self {
            name,
            store: RwLock::new(EntryStore::new()),
            counters: Counters::new(),
            cache: Mutex::new(Cache::default()),
        }
    }

    fn invalidate_cache(&self) {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        cache.unordered = None;
        cache.ordered = None;
    }

    fn cached_unordered(&self) -> Vec<Entry> {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        if let Some(entries) = &cache.unordered {
            return entries.clone();
        }
        let entries = self
            .store
            .read()
            .expect("store rwlock poisoned")
            .entries_unordered();
        cache.unordered = Some(entries.clone());
        entries
    }

    fn cached_ordered(&self) -> Vec<Entry> {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        if let Some(entries) = &cache.ordered {
            return entries.clone();
        }
        let entries = self
            .store
            .read()
            .expect("store rwlock poisoned")
            .entries_ordered();
        cache.ordered = Some(entries.clone());
        entries
    }
}

impl KvEngine for InMemoryEngine {
    fn db_name(&self) -> DbName {
        self.name
    }

    fn get(&self, key: &[u8], _flags: ReadFlags) -> Result<Option<Value>, DbError> {
        self.counters.bump_reads(1);
        let value = self.store.read().expect("store rwlock poisoned").get(key);
        trace!(db = %self.name, hit = value.is_some(), "get");
        Ok(value)
    }

    fn get_many(&self, keys: &[Key]) -> Result<Vec<Option<Value>>, DbError> {
        self.counters.bump_reads(keys.len() as u64);
        let store = self.store.read().expect("store rwlock poisoned");
        Ok(keys.iter().map(|k| store.get(k)).collect())
    }

    fn has(&self, key: &[u8]) -> Result<bool, DbError> {
        self.counters.bump_reads(1);
        Ok(self.store.read().expect("store rwlock poisoned").has(key))
    }

    fn get_all(&self, ordered: bool) -> Result<Vec<Entry>, DbError> {
        Ok(if ordered {
            self.cached_ordered()
        } else {
            self.cached_unordered()
        })
    }

    fn seek(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(crate::ordering::seek(&self.cached_ordered(), key, prefix))
    }

    fn next(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(crate::ordering::next(&self.cached_ordered(), key, prefix))
    }

    fn range(&self, prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError> {
        Ok(crate::ordering::range(&self.cached_ordered(), prefix))
    }

    fn put(&self, key: &[u8], value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        self.store
            .write()
            .expect("store rwlock poisoned")
            .put(key, value);
        self.invalidate_cache();
        self.counters.bump_writes(1);
        Ok(())
    }

    fn merge(&self, _key: &[u8], _value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        warn!(db = %self.name, "merge rejected: not supported by the memory DB");
        Err(DbError::merge_unsupported_in_memory())
    }

    fn remove(&self, key: &[u8]) -> Result<(), DbError> {
        self.store
            .write()
            .expect("store rwlock poisoned")
            .remove(key);
        self.invalidate_cache();
        self.counters.bump_writes(1);
        Ok(())
    }

    fn create_snapshot(&self) -> Result<Box<dyn Snapshot>, DbError> {
        // Eagerly clone the whole map (§3, §4.3): later engine mutations
        // never touch this copy, so the snapshot stays a true point-in-time
        // view for its entire lifetime.
        let store = self.store.read().expect("store rwlock poisoned").clone();
        debug!(db = %self.name, entries = store.len(), "snapshot acquired");
        Ok(Box::new(store))
    }

    fn start_write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, DbError> {
        // Write-through (§4.3, §9 Open Questions): puts/removes land on the
        // engine immediately, so `clear` has nothing to undo and release is
        // a no-op.
        Ok(Box::new(InMemoryWriteBatch { engine: self }))
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), DbError> {
        // Prepare phase: validate every op (and reject `merge` outright)
        // before touching storage, so a rejected op leaves state untouched
        // (§4.3, §5, §7). There is nothing left to validate for raw byte
        // keys/values beyond the merge check, but the two-phase shape is
        // kept so the atomicity guarantee holds for any future op kind.
        let mut prepared = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                BatchOp::Put(key, value) => prepared.push(BatchOp::Put(key, value)),
                BatchOp::Remove(key) => prepared.push(BatchOp::Remove(key)),
                BatchOp::Merge(_, _) => {
                    warn!(db = %self.name, "write batch prepare failed: merge op rejected");
                    return Err(DbError::merge_unsupported_in_memory());
                }
            }
        }

        let mut store = self.store.write().expect("store rwlock poisoned");
        for op in &prepared {
            match op {
                BatchOp::Put(key, value) => store.put(key, value),
                BatchOp::Remove(key) => store.remove(key),
                BatchOp::Merge(_, _) => unreachable!("merge ops are rejected during prepare"),
            }
        }
        drop(store);
        self.invalidate_cache();
        // Counters bump only after the prepared ops are actually applied,
        // matching the atomicity guarantee (§9 Open Questions).
        self.counters.bump_writes(prepared.len() as u64);
        Ok(())
    }

    fn flush(&self, _only_wal: bool) -> Result<(), DbError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), DbError> {
        self.store.write().expect("store rwlock poisoned").clear();
        self.invalidate_cache();
        Ok(())
    }

    fn compact(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn gather_metric(&self) -> DbMetric {
        let size = self.store.read().expect("store rwlock poisoned").len() as u64;
        self.counters.snapshot(size)
    }
}

struct InMemoryWriteBatch<'a> {
    engine: &'a InMemoryEngine,
}

impl WriteBatch for InMemoryWriteBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), DbError> {
        self.engine.put(key, value, WriteFlags::none())
    }

    fn remove(&mut self, key: &[u8]) -> Result<(), DbError> {
        self.engine.remove(key)
    }

    fn merge(&mut self, key: &[u8], value: &[u8]) -> Result<(), DbError> {
        self.engine.merge(key, value, WriteFlags::none())
    }

    fn clear(&mut self) -> Result<(), DbError> {
        // Write-through batch: prior puts/removes already landed on the
        // engine, so there is nothing queued to discard (§4.3).
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> InMemoryEngine {
        InMemoryEngine::new(DbName::State)
    }

    #[test]
    fn scenario_7_put_get_remove_has() {
        let db = engine();
        db.put(&[0x01], &[0xde, 0xad, 0xbe, 0xef], WriteFlags::none())
            .unwrap();
        assert_eq!(
            db.get(&[0x01], ReadFlags::none()).unwrap(),
            Some(vec![0xde, 0xad, 0xbe, 0xef])
        );
        db.remove(&[0x01]).unwrap();
        assert_eq!(db.get(&[0x01], ReadFlags::none()).unwrap(), None);
        assert!(!db.has(&[0x01]).unwrap());
    }

    #[test]
    fn scenario_8_ordered_keys_respect_the_tie_break() {
        let db = engine();
        db.put(&[0x01], &[0x11], WriteFlags::none()).unwrap();
        db.put(&[0x01, 0x00], &[0x22], WriteFlags::none()).unwrap();
        let keys = db.get_all_keys(true).unwrap();
        assert_eq!(keys, vec![vec![0x01, 0x00], vec![0x01]]);
    }

    #[test]
    fn scenario_9_snapshot_isolation() {
        let db = engine();
        db.put(b"k", b"A", WriteFlags::none()).unwrap();
        let snapshot = db.create_snapshot().unwrap();
        db.put(b"k", b"B", WriteFlags::none()).unwrap();
        assert_eq!(snapshot.get(b"k").unwrap(), Some(b"A".to_vec()));
        assert_eq!(db.get(b"k", ReadFlags::none()).unwrap(), Some(b"B".to_vec()));
    }

    #[test]
    fn scenario_13_metric_counters() {
        let db = engine();
        db.put(b"k", b"v", WriteFlags::none()).unwrap();
        db.get(b"k", ReadFlags::none()).unwrap();
        let metric = db.gather_metric();
        assert_eq!(metric.size, 1);
        assert_eq!(metric.cache_size, 0);
        assert_eq!(metric.index_size, 0);
        assert_eq!(metric.memtable_size, 0);
        assert_eq!(metric.total_reads, 1);
        assert_eq!(metric.total_writes, 1);
    }

    #[test]
    fn merge_is_rejected_with_the_dedicated_error() {
        let db = engine();
        let err = db.merge(b"k", b"v", WriteFlags::none()).unwrap_err();
        assert_eq!(err.message(), "Merge is not supported by the memory DB");
    }

    #[test]
    fn write_batch_atomicity_rejects_merge_without_mutating_state() {
        let db = engine();
        db.put(b"k", b"A", WriteFlags::none()).unwrap();
        let result = db.write_batch(vec![
            BatchOp::Put(b"k".to_vec(), b"B".to_vec()),
            BatchOp::Merge(b"k".to_vec(), b"x".to_vec()),
        ]);
        assert!(result.is_err());
        assert_eq!(db.get(b"k", ReadFlags::none()).unwrap(), Some(b"A".to_vec()));
    }

    #[test]
    fn write_batch_applies_every_op_atomically_in_order() {
        let db = engine();
        db.write_batch(vec![
            BatchOp::Put(b"a".to_vec(), b"1".to_vec()),
            BatchOp::Put(b"a".to_vec(), b"2".to_vec()),
            BatchOp::Remove(b"b".to_vec()),
        ])
        .unwrap();
        assert_eq!(db.get(b"a", ReadFlags::none()).unwrap(), Some(b"2".to_vec()));
        // 3 ops prepared and applied: the counter bumps once per applied
        // op, not once per distinct key (§9 Open Questions).
        assert_eq!(db.gather_metric().total_writes, 3);
    }

    #[test]
    fn write_through_batch_commits_immediately_and_clear_is_a_no_op() {
        let db = engine();
        let mut batch = db.start_write_batch().unwrap();
        batch.put(b"k", b"v").unwrap();
        assert_eq!(db.get(b"k", ReadFlags::none()).unwrap(), Some(b"v".to_vec()));
        batch.clear().unwrap();
        assert_eq!(db.get(b"k", ReadFlags::none()).unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn mutating_a_returned_value_does_not_corrupt_stored_data() {
        let db = engine();
        db.put(b"k", b"v", WriteFlags::none()).unwrap();
        let mut returned = db.get(b"k", ReadFlags::none()).unwrap().unwrap();
        returned.push(b'!');
        assert_eq!(db.get(b"k", ReadFlags::none()).unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn cache_is_invalidated_on_every_mutation() {
        let db = engine();
        db.put(b"a", b"1", WriteFlags::none()).unwrap();
        assert_eq!(db.get_all(true).unwrap().len(), 1);
        db.put(b"b", b"2", WriteFlags::none()).unwrap();
        assert_eq!(db.get_all(true).unwrap().len(), 2);
        db.remove(b"a").unwrap();
        assert_eq!(db.get_all(true).unwrap().len(), 1);
    }
}
