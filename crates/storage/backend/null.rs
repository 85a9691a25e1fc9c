//! The null engine (C6, §4.4): reads are always empty, every write fails
//! with a dedicated error. Used where a caller needs a `KvEngine` handle
//! that is guaranteed never to retain anything — tests, and any database
//! name a provider chooses not to back with real storage.

use crate::catalog::DbName;
use crate::engine::{BatchOp, Entry, Key, KvEngine, Snapshot, Value, WriteBatch};
use crate::error::DbError;
use crate::flags::{ReadFlags, WriteFlags};
use crate::metric::DbMetric;
use tracing::warn;

#[derive(Debug)]
pub struct NullEngine {
    name: DbName,
}

impl NullEngine {
    pub fn new(name: DbName) -> Self {
        Self { name }
    }
}

impl KvEngine for NullEngine {
    fn db_name(&self) -> DbName {
        self.name
    }

    fn get(&self, _key: &[u8], _flags: ReadFlags) -> Result<Option<Value>, DbError> {
        Ok(None)
    }

    fn get_many(&self, keys: &[Key]) -> Result<Vec<Option<Value>>, DbError> {
        Ok(vec![None; keys.len()])
    }

    fn has(&self, _key: &[u8]) -> Result<bool, DbError> {
        Ok(false)
    }

    fn get_all(&self, _ordered: bool) -> Result<Vec<Entry>, DbError> {
        Ok(Vec::new())
    }

    fn seek(&self, _key: &[u8], _prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(None)
    }

    fn next(&self, _key: &[u8], _prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(None)
    }

    fn range(&self, _prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError> {
        Ok(Vec::new())
    }

    fn put(&self, _key: &[u8], _value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        warn!(db = %self.name, "put rejected: NullDb does not support writes");
        Err(DbError::null_db_writes_unsupported())
    }

    fn merge(&self, _key: &[u8], _value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        warn!(db = %self.name, "merge rejected: NullDb does not support writes");
        Err(DbError::null_db_writes_unsupported())
    }

    fn remove(&self, _key: &[u8]) -> Result<(), DbError> {
        warn!(db = %self.name, "remove rejected: NullDb does not support writes");
        Err(DbError::null_db_writes_unsupported())
    }

    fn create_snapshot(&self) -> Result<Box<dyn Snapshot>, DbError> {
        Ok(Box::new(NullSnapshot))
    }

    fn start_write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, DbError> {
        Err(DbError::null_db_writes_unsupported())
    }

    fn write_batch(&self, _ops: Vec<BatchOp>) -> Result<(), DbError> {
        Err(DbError::null_db_writes_unsupported())
    }

    fn flush(&self, _only_wal: bool) -> Result<(), DbError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn compact(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn gather_metric(&self) -> DbMetric {
        DbMetric::default()
    }
}

#[derive(Debug)]
struct NullSnapshot;

impl Snapshot for NullSnapshot {
    fn get(&self, _key: &[u8]) -> Result<Option<Value>, DbError> {
        Ok(None)
    }

    fn get_all(&self, _ordered: bool) -> Result<Vec<Entry>, DbError> {
        Ok(Vec::new())
    }

    fn seek(&self, _key: &[u8], _prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(None)
    }

    fn next(&self, _key: &[u8], _prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Ok(None)
    }

    fn range(&self, _prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_always_empty() {
        let db = NullEngine::new(DbName::Metadata);
        assert_eq!(db.get(b"k", ReadFlags::none()).unwrap(), None);
        assert!(!db.has(b"k").unwrap());
        assert!(db.get_all(true).unwrap().is_empty());
    }

    #[test]
    fn every_write_fails_with_the_dedicated_error() {
        let db = NullEngine::new(DbName::Metadata);
        assert_eq!(
            db.put(b"k", b"v", WriteFlags::none()).unwrap_err().message(),
            "NullDb does not support writes"
        );
        assert!(db.merge(b"k", b"v", WriteFlags::none()).is_err());
        assert!(db.remove(b"k").is_err());
        assert!(db.write_batch(vec![BatchOp::Put(b"k".to_vec(), b"v".to_vec())]).is_err());
        assert!(db.start_write_batch().is_err());
    }

    #[test]
    fn maintenance_ops_succeed_as_no_ops() {
        let db = NullEngine::new(DbName::Metadata);
        assert!(db.flush(false).is_ok());
        assert!(db.clear().is_ok());
        assert!(db.compact().is_ok());
        assert_eq!(db.gather_metric(), DbMetric::default());
    }

    #[test]
    fn snapshot_reads_are_empty_too() {
        let db = NullEngine::new(DbName::Metadata);
        let snapshot = db.create_snapshot().unwrap();
        assert_eq!(snapshot.get(b"k").unwrap(), None);
        assert!(snapshot.range(None).unwrap().is_empty());
    }
}
