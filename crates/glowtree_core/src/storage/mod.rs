//! Injected key/value persistence.
//!
//! # Responsibility
//! - Define the get/set/remove contract the stores are written against.
//! - Provide an in-memory backend (tests, ephemeral sessions) and a SQLite
//!   backend (durable headless sessions).
//!
//! # Invariants
//! - Values are opaque strings; only the stores parse them.
//! - A failed `set` leaves the previous value in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Write would exceed the backend's capacity.
    QuotaExceeded { limit_bytes: usize, requested_bytes: usize },
    /// Any other backend failure, already rendered to text.
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                limit_bytes,
                requested_bytes,
            } => write!(
                f,
                "storage quota exceeded: {requested_bytes} bytes requested, limit {limit_bytes}"
            ),
            Self::Backend(message) => write!(f, "storage backend error: {message}"),
        }
    }
}

impl Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Backend(value.to_string())
    }
}

/// Key/value storage contract.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
