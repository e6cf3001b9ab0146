//! Filesystem storage backend.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use super::{Key, Storage, StorageError};

/// Storage rooted at a directory: the artifact for key `a/b` lives in the
/// file `<root>/a/b`.
///
/// Leading separators in a key are ignored, so `/a/b` and `a/b` name the same
/// file. Keys containing `..` components can never resolve outside the root:
/// they read as absent and refuse to be written.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &Key) -> Option<PathBuf> {
        let rel = Path::new(key.as_str().trim_start_matches('/'));
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(rel))
    }
}

fn io(key: &Key, source: std::io::Error) -> StorageError {
    StorageError::Io { key: key.clone(), source }
}

#[async_trait]
impl Storage for FileStorage {
    async fn exists(&self, key: &Key) -> Result<bool, StorageError> {
        let Some(path) = self.path_for(key) else {
            return Ok(false);
        };
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io(key, e)),
        }
    }

    async fn value(&self, key: &Key) -> Result<Bytes, StorageError> {
        let path = self.path_for(key).ok_or_else(|| StorageError::NotFound(key.clone()))?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.clone())),
            Err(e) => Err(io(key, e)),
        }
    }

    async fn save(&self, key: &Key, content: Bytes) -> Result<(), StorageError> {
        let path = self.path_for(key).ok_or_else(|| {
            io(key, std::io::Error::new(ErrorKind::InvalidInput, "key escapes storage root"))
        })?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| io(key, e))?;
        }
        tokio::fs::write(&path, &content).await.map_err(|e| io(key, e))
    }

    async fn delete(&self, key: &Key) -> Result<(), StorageError> {
        let Some(path) = self.path_for(key) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_creates_parents_and_reads_back() {
        let td = TempDir::new().unwrap();
        let storage = FileStorage::new(td.path());
        let key = Key::new("tarballs/decimal-2.0.0.tar");

        storage.save(&key, Bytes::from_static(&[1, 2, 3])).await.unwrap();
        assert!(td.path().join("tarballs/decimal-2.0.0.tar").is_file());
        assert!(storage.exists(&key).await.unwrap());
        assert_eq!(storage.value(&key).await.unwrap().as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn leading_separator_is_ignored() {
        let td = TempDir::new().unwrap();
        let storage = FileStorage::new(td.path());
        storage.save(&Key::new("b/c"), Bytes::from_static(b"x")).await.unwrap();
        assert!(storage.exists(&Key::new("/b/c")).await.unwrap());
    }

    #[tokio::test]
    async fn directories_are_not_artifacts() {
        let td = TempDir::new().unwrap();
        std::fs::create_dir(td.path().join("packages")).unwrap();
        let storage = FileStorage::new(td.path());
        assert!(!storage.exists(&Key::new("packages")).await.unwrap());
        assert!(!storage.exists(&Key::new("")).await.unwrap());
    }

    #[tokio::test]
    async fn parent_components_never_leave_root() {
        let td = TempDir::new().unwrap();
        let inner = td.path().join("repo");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(td.path().join("secret"), b"s").unwrap();
        let storage = FileStorage::new(&inner);

        let key = Key::new("../secret");
        assert!(!storage.exists(&key).await.unwrap());
        assert!(matches!(storage.value(&key).await, Err(StorageError::NotFound(_))));
        assert!(matches!(
            storage.save(&key, Bytes::from_static(b"x")).await,
            Err(StorageError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let td = TempDir::new().unwrap();
        let storage = FileStorage::new(td.path());
        let key = Key::new("packages/missing");
        assert!(matches!(storage.value(&key).await, Err(StorageError::NotFound(_))));
        storage.delete(&key).await.unwrap();
    }
}
