//! Engine construction by configuration (C8, §4.7): `DbConfig`, path
//! resolution, and the two built-in factories (in-memory, persistent-stub).

use crate::backend::in_memory::InMemoryEngine;
use crate::backend::persistent_stub::PersistentStubEngine;
use crate::catalog::DbName;
use crate::engine::KvEngine;
use crate::error::DbError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Construction parameters for one engine (§4.7, §6). `name` must parse as
/// a [`DbName`]; `path`/`basePath` feed [`get_full_path`] and are otherwise
/// unused by the in-memory/null/persistent-stub engines, which hold no
/// filesystem state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbConfig {
    pub name: String,
    pub path: Option<String>,
    pub base_path: Option<String>,
}

impl DbConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            base_path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// The catalog name this config resolves to. Unknown names are
    /// rejected here, at construction (§6).
    pub fn db_name(&self) -> Result<DbName, DbError> {
        DbName::from_str(&self.name)
    }
}

fn is_relative_marker(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../") || path.starts_with(".\\") || path.starts_with("..\\")
}

/// `getFullPath` (§4.7): resolves a config's on-disk path without touching
/// the filesystem. Step 5's "process current working directory" is read via
/// [`std::env::current_dir`].
pub fn get_full_path(config: &DbConfig) -> Result<PathBuf, DbError> {
    // Step 1.
    let db_path = config.path.clone().unwrap_or_else(|| config.name.clone());

    // Step 2.
    let base_path = match &config.base_path {
        Some(base) if !base.is_empty() => base,
        _ => return Ok(PathBuf::from(db_path)),
    };

    // Step 3.
    if Path::new(&db_path).is_absolute() || is_relative_marker(&db_path) {
        return Ok(PathBuf::from(db_path));
    }

    // Step 4.
    if Path::new(base_path).is_absolute() || is_relative_marker(base_path) {
        return Ok(Path::new(base_path).join(db_path));
    }

    // Step 5.
    let cwd = std::env::current_dir()
        .map_err(|err| DbError::with_cause("Invalid DbConfig", err))?;
    Ok(cwd.join(base_path).join(db_path))
}

/// Constructs an engine from a [`DbConfig`] within a caller-supplied scope
/// (§4.7). Two built-in factories; both are stateless and thread-safe, so
/// one factory value can build any number of engines.
pub trait Factory: std::fmt::Debug {
    fn build(&self, config: &DbConfig) -> Result<Arc<dyn KvEngine>, DbError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFactory;

impl Factory for InMemoryFactory {
    fn build(&self, config: &DbConfig) -> Result<Arc<dyn KvEngine>, DbError> {
        Ok(Arc::new(InMemoryEngine::new(config.db_name()?)))
    }
}

#[derive(Debug, Default)]
pub struct PersistentStubFactory;

impl Factory for PersistentStubFactory {
    fn build(&self, config: &DbConfig) -> Result<Arc<dyn KvEngine>, DbError> {
        Ok(Arc::new(PersistentStubEngine::new(config.db_name()?)))
    }
}
