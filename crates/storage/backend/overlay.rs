//! The overlay wrapper (C7, §4.6): a read-through view over a base engine
//! with an optional in-memory write layer. Without the overlay it behaves
//! like a strict read-only handle; with it, writes land on the overlay and
//! shadow the base on read. Write-through commit semantics, reusing the
//! `EntryStore` from C5 for the overlay's write layer.

use crate::engine::{BatchOp, Entry, KvEngine, Snapshot, Value, WriteBatch};
use crate::error::DbError;
use crate::flags::{ReadFlags, WriteFlags};
use crate::metric::DbMetric;
use crate::store::EntryStore;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

pub struct OverlayEngine {
    base: Arc<dyn KvEngine>,
    overlay: Option<RwLock<EntryStore>>,
}

impl OverlayEngine {
    /// Wraps `base`. `with_overlay` selects whether an in-memory write
    /// layer is allocated at all; without one, every write fails (§4.6).
    pub fn new(base: Arc<dyn KvEngine>, with_overlay: bool) -> Self {
        Self {
            base,
            overlay: with_overlay.then(|| RwLock::new(EntryStore::new())),
        }
    }

    /// Drops every overlay entry without touching the base (§4.6). A no-op
    /// without an overlay.
    pub fn clear_temp_changes(&self) {
        if let Some(overlay) = &self.overlay {
            debug!(db = %self.base.db_name(), "clearing overlay temp changes");
            overlay.write().expect("overlay rwlock poisoned").clear();
        }
    }

    /// The combined read view at this instant: base entries with overlay
    /// entries shadowing same-keyed base entries (§4.6).
    fn merged_view(&self) -> Result<EntryStore, DbError> {
        let mut merged = EntryStore::new();
        for (key, value) in self.base.get_all(false)? {
            merged.put(&key, &value);
        }
        if let Some(overlay) = &self.overlay {
            for (key, value) in overlay.read().expect("overlay rwlock poisoned").entries_unordered() {
                merged.put(&key, &value);
            }
        }
        Ok(merged)
    }
}

impl std::fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("base", &self.base.db_name())
            .field("has_overlay", &self.overlay.is_some())
            .finish()
    }
}

impl KvEngine for OverlayEngine {
    fn db_name(&self) -> crate::catalog::DbName {
        self.base.db_name()
    }

    fn get(&self, key: &[u8], flags: ReadFlags) -> Result<Option<Value>, DbError> {
        if let Some(overlay) = &self.overlay {
            if let Some(value) = overlay.read().expect("overlay rwlock poisoned").get(key) {
                return Ok(Some(value));
            }
        }
        self.base.get(key, flags)
    }

    fn get_all(&self, ordered: bool) -> Result<Vec<Entry>, DbError> {
        let merged = self.merged_view()?;
        Ok(if ordered {
            merged.entries_ordered()
        } else {
            merged.entries_unordered()
        })
    }

    fn seek(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(self.merged_view()?.seek(key, prefix))
    }

    fn next(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(self.merged_view()?.next(key, prefix))
    }

    fn range(&self, prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError> {
        Ok(self.merged_view()?.range(prefix))
    }

    fn put(&self, key: &[u8], value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        match &self.overlay {
            Some(overlay) => {
                overlay.write().expect("overlay rwlock poisoned").put(key, value);
                Ok(())
            }
            None => {
                warn!("put rejected: overlay has no write layer");
                Err(DbError::read_only_writes_unsupported())
            }
        }
    }

    fn merge(&self, _key: &[u8], _value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        // Unconditional, overlay or not (§4.6): merge is never meaningful
        // for a write-layer-over-base wrapper.
        warn!("merge rejected: not supported by the overlay wrapper");
        Err(DbError::read_only_merge_unsupported())
    }

    fn remove(&self, key: &[u8]) -> Result<(), DbError> {
        match &self.overlay {
            // Removing from the overlay un-shadows the base value; it does
            // not delete from the base itself (§4.6, §8 property 8).
            Some(overlay) => {
                overlay.write().expect("overlay rwlock poisoned").remove(key);
                Ok(())
            }
            None => {
                warn!("remove rejected: overlay has no write layer");
                Err(DbError::read_only_writes_unsupported())
            }
        }
    }

    fn create_snapshot(&self) -> Result<Box<dyn Snapshot>, DbError> {
        // Snapshot the base through its own `createSnapshot`, then deep
        // clone the overlay's current contents on top (§4.6): later
        // overlay mutations, including `clearTempChanges`, never reach
        // this copy.
        let base_snapshot = self.base.create_snapshot()?;
        let mut merged = EntryStore::new();
        for (key, value) in base_snapshot.get_all(false)? {
            merged.put(&key, &value);
        }
        if let Some(overlay) = &self.overlay {
            let frozen = overlay.read().expect("overlay rwlock poisoned").clone();
            for (key, value) in frozen.entries_unordered() {
                merged.put(&key, &value);
            }
        }
        debug!(db = %self.base.db_name(), entries = merged.len(), "overlay snapshot acquired");
        Ok(Box::new(merged))
    }

    fn start_write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, DbError> {
        match &self.overlay {
            Some(_) => Ok(Box::new(OverlayWriteBatch { engine: self })),
            None => Err(DbError::read_only_writes_unsupported()),
        }
    }

    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), DbError> {
        let overlay = match &self.overlay {
            Some(overlay) => overlay,
            None => return Err(DbError::read_only_writes_unsupported()),
        };

        // Prepare phase: a single `merge` rejects the whole batch and
        // leaves the overlay untouched (§4.6).
        let mut prepared = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                BatchOp::Put(key, value) => prepared.push(BatchOp::Put(key, value)),
                BatchOp::Remove(key) => prepared.push(BatchOp::Remove(key)),
                BatchOp::Merge(_, _) => return Err(DbError::read_only_merge_unsupported()),
            }
        }

        let mut store = overlay.write().expect("overlay rwlock poisoned");
        for op in prepared {
            match op {
                BatchOp::Put(key, value) => store.put(&key, &value),
                BatchOp::Remove(key) => store.remove(&key),
                BatchOp::Merge(_, _) => unreachable!("merge ops are rejected during prepare"),
            }
        }
        Ok(())
    }

    fn flush(&self, _only_wal: bool) -> Result<(), DbError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), DbError> {
        // Always fails, overlay or not (§4.6): the wrapper never owns the
        // authority to wipe the base, and wiping only the overlay would
        // silently diverge from what `clear()` means elsewhere.
        Err(DbError::read_only_writes_unsupported())
    }

    fn compact(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn gather_metric(&self) -> DbMetric {
        self.base.gather_metric()
    }
}

struct OverlayWriteBatch<'a> {
    engine: &'a OverlayEngine,
}

impl WriteBatch for OverlayWriteBatch<'_> {
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
        Ok(())
    }
}
