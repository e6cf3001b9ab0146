//! Artifact storage.
//!
//! [`Storage`] is the capability the repository server consumes. The
//! download path only ever calls [`Storage::exists`] and [`Storage::value`];
//! `save` and `delete` exist so a store can be populated and maintained by
//! whoever owns it (a publisher, an operator, a test).
//!
//! Artifacts are immutable once written, so backends only have to make
//! concurrent reads safe.

mod fs;
mod key;
mod memory;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

pub use fs::FileStorage;
pub use key::Key;
pub use memory::InMemoryStorage;

/// Failure of a storage operation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// `value` was asked for a key that holds nothing.
    #[error("no artifact at key `{0}`")]
    NotFound(Key),

    #[error("storage i/o on key `{key}`: {source}")]
    Io {
        key: Key,
        #[source]
        source: std::io::Error,
    },
}

/// Key/value storage for artifacts.
#[async_trait]
pub trait Storage: Send + Sync + fmt::Debug {
    /// Whether an artifact is stored at `key`.
    async fn exists(&self, key: &Key) -> Result<bool, StorageError>;

    /// The bytes stored at `key`. Fails with [`StorageError::NotFound`] when
    /// there are none.
    async fn value(&self, key: &Key) -> Result<Bytes, StorageError>;

    /// Store `content` at `key`, replacing whatever was there.
    async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError>;

    /// Remove the artifact at `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &Key) -> Result<(), StorageError>;
}
