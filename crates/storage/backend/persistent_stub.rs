//! The persistent-engine stub (C6, §4.4): every operation fails, naming
//! itself in the error message. This exists purely to exercise the factory
//! and provider layers and reserve the integration seam for a real on-disk
//! engine (LSM/B-tree) — out of scope for this crate (§1).

use crate::catalog::DbName;
use crate::engine::{BatchOp, Entry, Key, KvEngine, Snapshot, Value, WriteBatch};
use crate::error::DbError;
use crate::flags::{ReadFlags, WriteFlags};
use crate::metric::DbMetric;
use tracing::{debug, error};

#[derive(Debug)]
pub struct PersistentStubEngine {
    name: DbName,
}

impl PersistentStubEngine {
    pub fn new(name: DbName) -> Self {
        debug!(db = %name, "constructing persistent-stub engine (no real backend wired)");
        Self { name }
    }

    fn unimplemented<T>(operation: &str) -> Result<T, DbError> {
        error!(operation, "persistent-stub engine has no implementation");
        Err(DbError::persistent_stub_unimplemented(operation))
    }
}

impl KvEngine for PersistentStubEngine {
    fn db_name(&self) -> DbName {
        self.name
    }

    fn get(&self, _key: &[u8], _flags: ReadFlags) -> Result<Option<Value>, DbError> {
        Self::unimplemented("get")
    }

    fn get_many(&self, _keys: &[Key]) -> Result<Vec<Option<Value>>, DbError> {
        Self::unimplemented("getMany")
    }

    fn has(&self, _key: &[u8]) -> Result<bool, DbError> {
        Self::unimplemented("has")
    }

    fn get_all(&self, _ordered: bool) -> Result<Vec<Entry>, DbError> {
        Self::unimplemented("getAll")
    }

    fn seek(&self, _key: &[u8], _prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Self::unimplemented("seek")
    }

    fn next(&self, _key: &[u8], _prefix: Option<&[u8]>) -> Result<Option<Entry>, DbError> {
        Self::unimplemented("next")
    }

    fn range(&self, _prefix: Option<&[u8]>) -> Result<Vec<Entry>, DbError> {
        Self::unimplemented("range")
    }

    fn put(&self, _key: &[u8], _value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        Self::unimplemented("put")
    }

    fn merge(&self, _key: &[u8], _value: &[u8], _flags: WriteFlags) -> Result<(), DbError> {
        Self::unimplemented("merge")
    }

    fn remove(&self, _key: &[u8]) -> Result<(), DbError> {
        Self::unimplemented("remove")
    }

    fn create_snapshot(&self) -> Result<Box<dyn Snapshot>, DbError> {
        Self::unimplemented("createSnapshot")
    }

    fn start_write_batch(&self) -> Result<Box<dyn WriteBatch + '_>, DbError> {
        Self::unimplemented("startWriteBatch")
    }

    fn write_batch(&self, _ops: Vec<BatchOp>) -> Result<(), DbError> {
        Self::unimplemented("writeBatch")
    }

    fn flush(&self, _only_wal: bool) -> Result<(), DbError> {
        Self::unimplemented("flush")
    }

    fn clear(&self) -> Result<(), DbError> {
        Self::unimplemented("clear")
    }

    fn compact(&self) -> Result<(), DbError> {
        Self::unimplemented("compact")
    }

    fn gather_metric(&self) -> DbMetric {
        // Maintenance read with no fallible signature in the contract
        // (§4.2); the stub has nothing to report, so it returns the
        // zeroed record rather than panicking.
        DbMetric::default()
    }
}
