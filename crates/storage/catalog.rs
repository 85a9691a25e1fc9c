//! The closed catalog of named databases (§3) and their multi-column
//! columns, as a typed enum rather than bare `&str` constants, since this
//! crate's engines are named at construction and that name is validated,
//! not just used as a raw table-name string.

use crate::error::DbError;
use std::fmt;

/// One of the fifteen logical databases every provider builds (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DbName {
    Storage,
    State,
    Code,
    Blocks,
    Headers,
    BlockNumbers,
    Receipts,
    BlockInfos,
    BadBlocks,
    Bloom,
    Metadata,
    BlobTransactions,
    DiscoveryNodes,
    DiscoveryV5Nodes,
    Peers,
}

/// The full catalog, in the order §3 lists it.
pub const ALL_DB_NAMES: [DbName; 15] = [
    DbName::Storage,
    DbName::State,
    DbName::Code,
    DbName::Blocks,
    DbName::Headers,
    DbName::BlockNumbers,
    DbName::Receipts,
    DbName::BlockInfos,
    DbName::BadBlocks,
    DbName::Bloom,
    DbName::Metadata,
    DbName::BlobTransactions,
    DbName::DiscoveryNodes,
    DbName::DiscoveryV5Nodes,
    DbName::Peers,
];

impl DbName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbName::Storage => "storage",
            DbName::State => "state",
            DbName::Code => "code",
            DbName::Blocks => "blocks",
            DbName::Headers => "headers",
            DbName::BlockNumbers => "blockNumbers",
            DbName::Receipts => "receipts",
            DbName::BlockInfos => "blockInfos",
            DbName::BadBlocks => "badBlocks",
            DbName::Bloom => "bloom",
            DbName::Metadata => "metadata",
            DbName::BlobTransactions => "blobTransactions",
            DbName::DiscoveryNodes => "discoveryNodes",
            DbName::DiscoveryV5Nodes => "discoveryV5Nodes",
            DbName::Peers => "peers",
        }
    }

    /// Whether this name is a multi-column database (§3).
    pub fn is_multi_column(&self) -> bool {
        matches!(self, DbName::Receipts | DbName::BlobTransactions)
    }

    /// The columns of a multi-column database, in declaration order. Empty
    /// for single-column databases.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            DbName::Receipts => &["default", "transactions", "blocks"],
            DbName::BlobTransactions => &["fullBlobTxs", "lightBlobTxs", "processedTxs"],
            _ => &[],
        }
    }
}

impl fmt::Display for DbName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DbName {
    type Err = DbError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ALL_DB_NAMES
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == name)
            .ok_or_else(DbError::invalid_db_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_entry_round_trips_through_its_string_form() {
        for name in ALL_DB_NAMES {
            assert_eq!(name.as_str().parse::<DbName>().unwrap(), name);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!("not_a_db".parse::<DbName>().is_err());
    }

    #[test]
    fn only_receipts_and_blob_transactions_are_multi_column() {
        for name in ALL_DB_NAMES {
            let expected = matches!(name, DbName::Receipts | DbName::BlobTransactions);
            assert_eq!(name.is_multi_column(), expected);
        }
    }

    #[test]
    fn receipts_columns_match_the_spec() {
        assert_eq!(
            DbName::Receipts.columns(),
            &["default", "transactions", "blocks"]
        );
        assert_eq!(
            DbName::BlobTransactions.columns(),
            &["fullBlobTxs", "lightBlobTxs", "processedTxs"]
        );
        assert!(DbName::State.columns().is_empty());
    }
}
