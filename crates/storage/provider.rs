//! The provider layer (C8, §4.7): builds every named database in the
//! catalog within one scope and exposes both generic (`get_db`,
//! `get_column_db`) and per-name convenience accessors. One
//! `Arc<dyn KvEngine>` per catalog entry, plus two [`ColumnGroup`]s for the
//! multi-column names, all owned and torn down together.

use crate::backend::in_memory::InMemoryEngine;
use crate::catalog::DbName;
use crate::engine::KvEngine;
use crate::error::DbError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// One column of a multi-column database (§3, §4.7): an independent engine
/// scoped under its parent name.
#[derive(Debug)]
pub struct ColumnGroup {
    name: DbName,
    columns: BTreeMap<&'static str, Arc<dyn KvEngine>>,
}

impl ColumnGroup {
    fn build(name: DbName) -> Self {
        let columns = name
            .columns()
            .iter()
            .map(|&column| (column, Arc::new(InMemoryEngine::new(name)) as Arc<dyn KvEngine>))
            .collect();
        Self { name, columns }
    }

    pub fn name(&self) -> DbName {
        self.name
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.keys().copied()
    }

    /// Returns the engine for `column`, or `None` if `column` is not one of
    /// this group's declared columns (§4.7).
    pub fn get_column(&self, column: &str) -> Option<&Arc<dyn KvEngine>> {
        self.columns.get(column)
    }
}

/// `createColumnsDb({name})` (§4.7): validates that `name` is one of the
/// catalog's multi-column entries, then constructs one independent engine
/// per declared column. Any other name fails with "Invalid column DB name".
pub fn create_columns_db(name: DbName) -> Result<ColumnGroup, DbError> {
    if !name.is_multi_column() {
        return Err(DbError::invalid_column_name(name));
    }
    Ok(ColumnGroup::build(name))
}

/// Builds every single-column database of the catalog plus both
/// multi-column groups (§4.7). Distinct named databases are strictly
/// isolated (§4.7): each is backed by its own [`InMemoryEngine`] instance.
#[derive(Debug)]
pub struct Provider {
    dbs: BTreeMap<DbName, Arc<dyn KvEngine>>,
    column_groups: BTreeMap<DbName, ColumnGroup>,
}

impl Provider {
    pub fn new() -> Self {
        info!("starting storage provider");
        let mut dbs = BTreeMap::new();
        let mut column_groups = BTreeMap::new();
        for name in crate::catalog::ALL_DB_NAMES {
            if name.is_multi_column() {
                column_groups.insert(
                    name,
                    create_columns_db(name).expect("catalog entry is multi-column by construction"),
                );
            } else {
                dbs.insert(name, Arc::new(InMemoryEngine::new(name)) as Arc<dyn KvEngine>);
            }
        }
        info!(
            single_column = dbs.len(),
            column_groups = column_groups.len(),
            "storage provider started"
        );
        Self { dbs, column_groups }
    }

    /// The single-column engine for `name` (§4.7). Panics if `name` is a
    /// multi-column database; such names have no single engine to return,
    /// only a [`ColumnGroup`] via [`Self::get_column_db`].
    pub fn get_db(&self, name: DbName) -> Arc<dyn KvEngine> {
        self.dbs
            .get(&name)
            .unwrap_or_else(|| panic!("{name} is a multi-column database; use get_column_db"))
            .clone()
    }

    /// The [`ColumnGroup`] for a multi-column `name` (§4.7).
    pub fn get_column_db(&self, name: DbName) -> Result<&ColumnGroup, DbError> {
        self.column_groups
            .get(&name)
            .ok_or_else(|| DbError::invalid_column_name(name))
    }

    pub fn storage_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Storage)
    }

    pub fn state_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::State)
    }

    pub fn code_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Code)
    }

    pub fn blocks_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Blocks)
    }

    pub fn headers_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Headers)
    }

    pub fn block_numbers_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::BlockNumbers)
    }

    pub fn receipts_db(&self) -> &ColumnGroup {
        self.column_groups
            .get(&DbName::Receipts)
            .expect("receipts is always built as a column group")
    }

    pub fn block_infos_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::BlockInfos)
    }

    pub fn bad_blocks_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::BadBlocks)
    }

    pub fn bloom_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Bloom)
    }

    pub fn metadata_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Metadata)
    }

    pub fn blob_transactions_db(&self) -> &ColumnGroup {
        self.column_groups
            .get(&DbName::BlobTransactions)
            .expect("blobTransactions is always built as a column group")
    }

    pub fn discovery_nodes_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::DiscoveryNodes)
    }

    pub fn discovery_v5_nodes_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::DiscoveryV5Nodes)
    }

    pub fn peers_db(&self) -> Arc<dyn KvEngine> {
        self.get_db(DbName::Peers)
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new()
    }
}
