//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::{Key, Storage, StorageError};

/// Storage held in a process-local map.
///
/// Values are `Bytes`, so a read clones a reference count, not the artifact.
/// The lock is never held across an await point.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    map: RwLock<HashMap<Key, Bytes>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn exists(&self, key: &Key) -> Result<bool, StorageError> {
        Ok(self.map.read().contains_key(key))
    }

    async fn value(&self, key: &Key) -> Result<Bytes, StorageError> {
        self.map
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.clone()))
    }

    async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError> {
        self.map.write().insert(key.clone(), content);
        Ok(())
    }

    async fn delete(&self, key: &Key) -> Result<(), StorageError> {
        self.map.write().remove(key);
        Ok(())
    }
}
