//! In-memory blob store.
//!
//! Behaves like browser local storage: an optional byte quota over all
//! keys and values, with writes that would exceed it rejected and the
//! previous value left untouched.

use crate::{BlobStore, Result, StorageError};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Mutex<Option<usize>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::default();
        store.set_quota(Some(bytes));
        store
    }

    /// Change or lift the quota. Existing entries are kept either way.
    pub fn set_quota(&self, bytes: Option<usize>) {
        *self.quota.lock().unwrap() = bytes;
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(quota) = *self.quota.lock().unwrap() {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let store = InMemoryBlobStore::new();
        assert_eq!(store.read("activityReports").unwrap(), None);
    }

    #[test]
    fn test_write_overwrites() {
        let store = InMemoryBlobStore::new();
        store.write("k", "one").unwrap();
        store.write("k", "two").unwrap();
        assert_eq!(store.read("k").unwrap(), Some("two".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_quota_rejects_and_keeps_previous_value() {
        let store = InMemoryBlobStore::with_quota(10);
        store.write("k", "short").unwrap();

        let result = store.write("k", "much too long");
        assert!(matches!(
            result,
            Err(StorageError::QuotaExceeded { quota: 10, .. })
        ));
        assert_eq!(store.read("k").unwrap(), Some("short".to_string()));
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let store = InMemoryBlobStore::with_quota(6);
        store.write("k", "12345").unwrap();
        store.write("k", "abcde").unwrap();
        assert_eq!(store.used_bytes(), 6);
    }

    #[test]
    fn test_lifting_quota_allows_writes() {
        let store = InMemoryBlobStore::with_quota(1);
        assert!(store.write("k", "v").is_err());
        store.set_quota(None);
        store.write("k", "v").unwrap();
    }
}
