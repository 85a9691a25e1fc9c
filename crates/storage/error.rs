//! The single tagged error kind used across the whole storage surface (§6/§7).
//!
//! Every fallible operation in this crate returns `Result<_, DbError>`. There
//! is no hierarchy of error types per backend: validation failures,
//! unsupported-operation failures, and propagated allocation failures are all
//! represented the same way, distinguished only by their message.

use std::fmt;
use thiserror::Error;

/// A storage-layer error: a human-readable message plus an optional cause.
///
/// Every fallible operation in the crate returns this one type. Unlike the
/// per-backend `thiserror` enums a transaction-graph store tends to grow,
/// the contract here (§6/§7) asks for a single tagged kind distinguished by
/// message text, so there is no variant list to keep in sync with callers.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DbError {
    message: String,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl DbError {
    /// Builds an error with no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Builds an error wrapping an underlying cause.
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    // -- well-known messages (§6) --------------------------------------

    pub fn invalid_db_config() -> Self {
        Self::new("Invalid DbConfig")
    }

    pub fn invalid_key() -> Self {
        Self::new("Invalid DB key")
    }

    pub fn invalid_value() -> Self {
        Self::new("Invalid DB value")
    }

    pub fn invalid_column_name(name: impl fmt::Display) -> Self {
        Self::new(format!("Invalid column DB name: {name}"))
    }

    pub fn merge_unsupported_in_memory() -> Self {
        Self::new("Merge is not supported by the memory DB")
    }

    pub fn null_db_writes_unsupported() -> Self {
        Self::new("NullDb does not support writes")
    }

    pub fn read_only_writes_unsupported() -> Self {
        Self::new("ReadOnlyDb does not support writes")
    }

    pub fn read_only_merge_unsupported() -> Self {
        Self::new("ReadOnlyDb does not support merge")
    }

    pub fn persistent_stub_unimplemented(operation: impl fmt::Display) -> Self {
        Self::new(format!(
            "RocksDb backend stub does not implement {operation}"
        ))
    }

    pub fn write_batch_clear_failed() -> Self {
        Self::new("Failed to clear write batch")
    }
}
