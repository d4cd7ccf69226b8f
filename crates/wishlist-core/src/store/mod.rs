//! Durable key-value slots holding serialized wishlist snapshots.
//!
//! The engine only needs a get/set pair over string keys and values. Three
//! backends ship with the crate:
//!
//! - [`MemoryStore`]: a `HashMap`, for tests and throwaway sessions
//! - [`FileStore`]: one JSON file per key, replaced atomically
//! - [`SqliteStore`]: a single `kv` table in a WAL-mode database

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{StorageBackend, StorageConfig};
use crate::error::ErrorCode;

/// Which storage operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Open,
    Read,
    Write,
    Remove,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Read => "read",
            Self::Write => "write",
            Self::Remove => "remove",
        })
    }
}

/// Storage backend failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: StoreOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sqlite {op} failed: {source}")]
    Sqlite {
        op: StoreOp,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn io(op: StoreOp, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn sqlite(op: StoreOp, source: rusqlite::Error) -> Self {
        Self::Sqlite { op, source }
    }

    #[must_use]
    pub const fn op(&self) -> StoreOp {
        match self {
            Self::Io { op, .. } | Self::Sqlite { op, .. } => *op,
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self.op() {
            StoreOp::Open | StoreOp::Read => ErrorCode::StorageReadFailed,
            StoreOp::Write | StoreOp::Remove => ErrorCode::StorageWriteFailed,
        }
    }
}

/// Durable string key-value collaborator.
///
/// Writes are treated as visible to the next `get` on the same store.
pub trait Storage {
    /// Read the value at `key`; `Ok(None)` when the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the slot at `key` in full.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the slot at `key`. Removing an empty slot is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Key prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "wishlist";

/// Slot key for a wishlist.
///
/// An explicit id yields `<prefix>-<id>`. Without one every wishlist shares
/// the bare `<prefix>` slot, even though each gets its own generated id.
#[must_use]
pub fn storage_key(prefix: &str, explicit_id: Option<&str>) -> String {
    match explicit_id {
        Some(id) if !id.is_empty() => format!("{prefix}-{id}"),
        _ => prefix.to_string(),
    }
}

/// Open the backend selected by `config`, resolving relative paths against
/// `root`.
///
/// # Errors
///
/// Returns an error if the SQLite database cannot be opened or the file
/// store directory cannot be created.
pub fn open_storage(config: &StorageConfig, root: &Path) -> Result<Box<dyn Storage>, StoreError> {
    let path = config.resolved_path(root);
    match config.backend {
        StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        StorageBackend::File => Ok(Box::new(FileStore::open(path)?)),
        StorageBackend::Sqlite => Ok(Box::new(SqliteStore::open(&path)?)),
    }
}
