//! The abstract key/value engine contract (§4.2): the operations every
//! backend (in-memory, null, persistent stub, overlay) must expose, flattened
//! into one engine trait plus two scoped-view traits (`Snapshot`,
//! `WriteBatch`) rather than a read/write-transaction split, since nothing
//! here distinguishes ro/rw transaction types the way an on-disk-engine
//! would.

use crate::catalog::DbName;
use crate::error::DbError;
use crate::flags::{ReadFlags, WriteFlags};
use crate::metric::DbMetric;
use std::fmt::Debug;

pub type Key = Vec<u8>;
pub type Value = Vec<u8>;
pub type Entry = (Key, Value);

/// One operation inside an atomic `write_batch` call (§4.2, §5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put(Key, Value),
    Remove(Key),
    Merge(Key, Value),
}

/// A scoped, read-only, point-in-time view over an engine's entries (§3,
/// §4.4). Mutations to the originating engine after the snapshot is taken
/// are never visible through it.
pub trait Snapshot: Debug {
    fn get(&self, key: &[u8]) -> Result<Option<Value>, DbError>;

    fn get_many(&self, keys: &[Key]) -> Result<Vec<Option<Value>>, DbError> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    fn has(&self, key: &[u8]) -> Result<bool, DbError> {
        Ok(self.get(key)?.is_some())
    }

    fn get_all(&self, ordered: bool) -> Result<Vec<Entry>, DbError>;

    fn get_all_keys(&self, ordered: bool) -> Result<Vec<Key>, DbError> {
        Ok(self.get_all(ordered)?.into_iter().map(|(k, _)| k).collect())
    }

    fn get_all_values(&self, ordered: bool) -> Result<Vec<Value>, DbError> {
        Ok(self.get_all(ordered)?.into_iter().map(|(_, v)| v).collect())
    }

    fn seek(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError>;

    fn next(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError>;

    fn range(&self, prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError>;
}

/// A scoped grouping of `put`/`remove`/`merge` operations (§4.2, §4.3).
///
/// Implementations may be write-through (each call mutates the owning
/// engine immediately, `clear` is a no-op on already-applied writes) or
/// deferred-commit (operations are staged and applied on scope exit);
/// §4.3/§9 treat both as conforming as long as ordering within the batch is
/// preserved and last-write-wins holds.
pub trait WriteBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), DbError>;
    fn remove(&mut self, key: &[u8]) -> Result<(), DbError>;
    fn merge(&mut self, key: &[u8], value: &[u8]) -> Result<(), DbError>;
    fn clear(&mut self) -> Result<(), DbError>;
}

/// The operations every backend exposes (§4.2).
pub trait KvEngine: Debug + Send + Sync {
    /// The logical name this engine was constructed under (§3).
    fn db_name(&self) -> DbName;

    fn get(&self, key: &[u8], flags: ReadFlags) -> Result<Option<Value>, DbError>;

    /// Counts as `keys.len()` reads (§4.2).
    fn get_many(&self, keys: &[Key]) -> Result<Vec<Option<Value>>, DbError> {
        keys.iter().map(|k| self.get(k, ReadFlags::none())).collect()
    }

    /// Counts as one read (§4.2).
    fn has(&self, key: &[u8]) -> Result<bool, DbError> {
        Ok(self.get(key, ReadFlags::none())?.is_some())
    }

    fn get_all(&self, ordered: bool) -> Result<Vec<Entry>, DbError>;

    fn get_all_keys(&self, ordered: bool) -> Result<Vec<Key>, DbError> {
        Ok(self.get_all(ordered)?.into_iter().map(|(k, _)| k).collect())
    }

    fn get_all_values(&self, ordered: bool) -> Result<Vec<Value>, DbError> {
        Ok(self.get_all(ordered)?.into_iter().map(|(_, v)| v).collect())
    }

    fn seek(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError>;

    fn next(&self, key: &[u8], prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError>;

    fn range(&self, prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError>;

    fn put(&self, key: &[u8], value: &[u8], flags: WriteFlags) -> Result<(), DbError>;

    /// Reference engines reject this (§4.2, §4.3); it exists so the
    /// contract reserves the seam for an engine that can actually merge.
    fn merge(&self, key: &[u8], value: &[u8], flags: WriteFlags) -> Result<(), DbError>;

    fn remove(&self, key: &[u8]) -> Result<(), DbError>;

    fn create_snapshot(&self) -> Result<Box<dyn Snapshot>, DbError>;

    fn start_write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, DbError>;

    /// Applies `ops` atomically: either every op takes effect, or none do
    /// (§4.2, §4.3, §5, §7). Implementations prepare (validate, encode,
    /// clone) before touching storage so a rejected op leaves no trace.
    fn write_batch(&self, ops: Vec<BatchOp>) -> Result<(), DbError>;

    fn flush(&self, only_wal: bool) -> Result<(), DbError>;

    fn clear(&self) -> Result<(), DbError>;

    fn compact(&self) -> Result<(), DbError>;

    fn gather_metric(&self) -> DbMetric;
}
