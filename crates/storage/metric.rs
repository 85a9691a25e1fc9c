//! The per-engine metric record (§3), and the atomic counters the in-memory
//! and overlay engines use to populate it: live atomics behind a
//! `snapshot()` call that returns a plain, `Copy`-able struct for reporting.

use std::sync::atomic::{AtomicU64, Ordering};

/// `{size, cacheSize, indexSize, memtableSize, totalReads, totalWrites}`
/// (§3/§6). All fields are non-negative by construction (`u64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DbMetric {
    pub size: u64,
    pub cache_size: u64,
    pub index_size: u64,
    pub memtable_size: u64,
    pub total_reads: u64,
    pub total_writes: u64,
}

/// Monotonic read/write counters an engine bumps on every operation.
///
/// In-memory engines report zero for `cache_size`/`index_size`/
/// `memtable_size`, since there is no cache, index, or memtable distinct
/// from the entry map itself (§3).
#[derive(Debug, Default)]
pub struct Counters {
    reads: AtomicU64,
    writes: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump_reads(&self, by: u64) {
        self.reads.fetch_add(by, Ordering::Relaxed);
    }

    pub fn bump_writes(&self, by: u64) {
        self.writes.fetch_add(by, Ordering::Relaxed);
    }

    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Builds the metric record for an in-memory-shaped engine: `size` is
    /// the caller-supplied entry count, cache/index/memtable are zero.
    pub fn snapshot(&self, size: u64) -> DbMetric {
        DbMetric {
            size,
            cache_size: 0,
            index_size: 0,
            memtable_size: 0,
            total_reads: self.reads(),
            total_writes: self.writes(),
        }
    }
}
