//! In-process blob store

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::BlobStore;
use crate::Result;

/// Blob store kept in memory. Clones share the same blobs, so a test can keep
/// a handle while a service owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `entries`
    #[must_use]
    pub fn with_blobs<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let blobs = entries
            .into_iter()
            .map(|(key, bytes)| (key.into(), bytes))
            .collect();
        Self {
            blobs: Arc::new(Mutex::new(blobs)),
        }
    }

    /// Copy of the blob stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Copy of every blob
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_loads_none() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.load("quotes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_blobs() {
        let store = MemoryBlobStore::new();
        let handle = store.clone();
        store.save("quotes", b"[]".to_vec()).await.unwrap();
        assert_eq!(handle.get("quotes").as_deref(), Some(&b"[]"[..]));
        assert_eq!(handle.snapshot().len(), 1);
    }
}
