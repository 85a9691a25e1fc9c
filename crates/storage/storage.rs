//! A byte-oriented key/value storage abstraction: pluggable engines,
//! scoped read snapshots, scoped write batches, atomic multi-op commits,
//! a read-through/write-overlay wrapper, and a naming/provider layer over
//! a fixed catalog of fifteen named databases.
//!
//! There is no on-disk engine here (out of scope, see `DESIGN.md`); the
//! in-memory engine is the one contract-complete reference implementation,
//! alongside a null engine and a persistent-backend stub that exist to
//! exercise the factory/provider layers and reserve the integration seam.
//!
//! ## Modules
//!
//! - [`error`]: the single tagged `DbError` kind used everywhere in this
//!   crate
//! - [`flags`]: `ReadFlags`/`WriteFlags` validated bitsets
//! - [`catalog`]: the closed set of fifteen named databases and their
//!   multi-column columns
//! - [`bytes`]: the byte-order tie-break and hex-key indexing helpers
//! - [`ordering`]: sort/prefix-filter/seek/next over an entry list, built
//!   on [`bytes`]
//! - [`metric`]: `DbMetric` and the atomic read/write counters engines
//!   report from
//! - [`engine`]: the `KvEngine`/`Snapshot`/`WriteBatch` contract
//! - [`store`]: `EntryStore`, the shared entry map backing every in-memory
//!   view
//! - [`backend`]: the concrete engines (in-memory, null, persistent stub,
//!   overlay)
//! - [`factory`]: `DbConfig`, `getFullPath`, and the two built-in factories
//! - [`provider`]: builds every named database within one scope

pub mod backend;
pub mod bytes;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod factory;
pub mod metric;
pub mod ordering;
pub mod provider;
pub mod store;

pub mod flags;

pub use backend::in_memory::InMemoryEngine;
pub use backend::null::NullEngine;
pub use backend::overlay::OverlayEngine;
pub use backend::persistent_stub::PersistentStubEngine;
pub use catalog::{DbName, ALL_DB_NAMES};
pub use engine::{BatchOp, Entry, Key, KvEngine, Snapshot, Value, WriteBatch};
pub use error::DbError;
pub use factory::{get_full_path, DbConfig, Factory, InMemoryFactory, PersistentStubFactory};
pub use flags::{ReadFlags, WriteFlags};
pub use metric::DbMetric;
pub use provider::{create_columns_db, ColumnGroup, Provider};
