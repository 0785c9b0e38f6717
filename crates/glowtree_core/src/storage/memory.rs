//! In-memory storage backend with an optional byte quota.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// `HashMap`-backed storage.
///
/// The quota counts key and value bytes across all entries, mirroring how
/// browser storage rejects writes once its budget is spent.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Returns the raw value under `key`, bypassing any parsing.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(limit) = self.quota_bytes {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let requested = self.used_bytes() - replaced + key.len() + value.len();
            if requested > limit {
                return Err(StorageError::QuotaExceeded {
                    limit_bytes: limit,
                    requested_bytes: requested,
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::storage::{KeyValueStorage, StorageError};

    #[test]
    fn quota_rejects_oversized_write_and_keeps_old_value() {
        let storage = MemoryStorage::with_quota(12);
        storage.set("k", "short").unwrap();

        let err = storage.set("k", "much longer value").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { limit_bytes: 12, .. }));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn overwrite_within_quota_is_accepted() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("k", "1234567").unwrap();
        storage.set("k", "7654321").unwrap();
        assert_eq!(storage.used_bytes(), 8);
    }
}
