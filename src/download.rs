//! Artifact download.
//!
//! Serves whatever is stored under the request path: `GET /tarballs/x.tar`
//! answers with the bytes at key `tarballs/x.tar`, or `404`.

use std::sync::Arc;

use tracing::info;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::status::Status;
use crate::storage::{Key, Storage, StorageError};

/// Download handler over a shared [`Storage`].
#[derive(Clone, Debug)]
pub struct DownloadSlice {
    storage: Arc<dyn Storage>,
}

impl DownloadSlice {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Answers a download of `path`.
    ///
    /// One existence check, then at most one read. A key that disappears in
    /// between surfaces as [`StorageError::NotFound`] from the read, and is
    /// therefore a server error rather than a `404`.
    pub async fn handle(&self, path: &str) -> Result<Response, StorageError> {
        let key = Key::from_request_path(path);
        if !self.storage.exists(&key).await? {
            return Ok(Response::status(Status::NotFound));
        }
        let content = self.storage.value(&key).await?;
        info!(key = %key, bytes = content.len(), "serving artifact");
        Ok(Response::builder().bytes(ContentType::OctetStream, content))
    }

    /// Turns the slice into a router handler keyed on the request path.
    pub fn into_handler(self) -> impl Handler {
        move |req: Request| {
            let slice = self.clone();
            async move { slice.handle(req.path()).await }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::method::Method;
    use crate::response::IntoResponse;
    use crate::storage::InMemoryStorage;

    async fn seeded(entries: &[(&str, &[u8])]) -> Arc<InMemoryStorage> {
        let storage = Arc::new(InMemoryStorage::new());
        for (key, bytes) in entries {
            storage.save(&Key::new(*key), Bytes::copy_from_slice(bytes)).await.unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn serves_stored_bytes_as_octet_stream() {
        let storage = seeded(&[("packages/decimal-2.0.0.tar", &[0x01, 0x02, 0x03])]).await;
        let slice = DownloadSlice::new(storage);

        let res = slice.handle("/packages/decimal-2.0.0.tar").await.unwrap();
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), &[0x01, 0x02, 0x03]);
        assert_eq!(res.header("content-type"), Some("application/octet-stream"));
    }

    #[tokio::test]
    async fn missing_key_is_empty_404() {
        let slice = DownloadSlice::new(seeded(&[]).await);
        let res = slice.handle("/packages/missing.tar").await.unwrap();
        assert_eq!(res.status_code(), Status::NotFound);
        assert!(res.body().is_empty());
        assert_eq!(res.header("content-type"), None);
    }

    #[tokio::test]
    async fn first_character_is_dropped_whatever_it_is() {
        let storage = seeded(&[("a/b/c", b"abc"), ("/b/c", b"bc")]).await;
        let slice = DownloadSlice::new(storage);

        assert_eq!(slice.handle("/a/b/c").await.unwrap().body(), b"abc");
        assert_eq!(slice.handle("a/b/c").await.unwrap().body(), b"bc");
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let slice = DownloadSlice::new(seeded(&[("tarballs/x.tar", b"xyz")]).await);
        for _ in 0..5 {
            let res = slice.handle("/tarballs/x.tar").await.unwrap();
            assert_eq!(res.status_code(), Status::Ok);
            assert_eq!(res.body(), b"xyz");
        }
        for _ in 0..3 {
            let res = slice.handle("/tarballs/y.tar").await.unwrap();
            assert_eq!(res.status_code(), Status::NotFound);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_downloads_do_not_interfere() {
        let storage = Arc::new(InMemoryStorage::new());
        for i in 0..32u8 {
            storage
                .save(&Key::new(format!("tarballs/pkg-{i}.tar")), Bytes::from(vec![i; 64]))
                .await
                .unwrap();
        }
        let slice = DownloadSlice::new(storage);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..32u8 {
            let slice = slice.clone();
            tasks.spawn(async move {
                let res = slice.handle(&format!("/tarballs/pkg-{i}.tar")).await.unwrap();
                (i, res)
            });
        }
        while let Some(joined) = tasks.join_next().await {
            let (i, res) = joined.unwrap();
            assert_eq!(res.status_code(), Status::Ok);
            assert_eq!(res.body(), vec![i; 64].as_slice());
        }
    }

    /// Counts calls and can lose its artifact between `exists` and `value`.
    #[derive(Debug, Default)]
    struct Probe {
        exists_calls: AtomicUsize,
        value_calls: AtomicUsize,
        vanish: bool,
        broken: bool,
    }

    #[async_trait]
    impl Storage for Probe {
        async fn exists(&self, key: &Key) -> Result<bool, StorageError> {
            self.exists_calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(StorageError::Io {
                    key: key.clone(),
                    source: std::io::Error::other("disk on fire"),
                });
            }
            Ok(true)
        }

        async fn value(&self, key: &Key) -> Result<Bytes, StorageError> {
            self.value_calls.fetch_add(1, Ordering::SeqCst);
            if self.vanish {
                return Err(StorageError::NotFound(key.clone()));
            }
            Ok(Bytes::from_static(b"ok"))
        }

        async fn save(&self, _: &Key, _: Bytes) -> Result<(), StorageError> { Ok(()) }
        async fn delete(&self, _: &Key) -> Result<(), StorageError> { Ok(()) }
    }

    #[tokio::test]
    async fn one_existence_check_and_one_read_per_request() {
        let probe = Arc::new(Probe::default());
        let slice = DownloadSlice::new(probe.clone());
        slice.handle("/k").await.unwrap();
        assert_eq!(probe.exists_calls.load(Ordering::SeqCst), 1);
        assert_eq!(probe.value_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn artifact_vanishing_mid_request_is_a_server_error() {
        let probe = Arc::new(Probe { vanish: true, ..Probe::default() });
        let slice = DownloadSlice::new(probe);
        let res = slice.handle("/k").await.into_response();
        assert_eq!(res.status_code(), Status::InternalServerError);
    }

    #[tokio::test]
    async fn failed_existence_check_skips_read_and_fails() {
        let probe = Arc::new(Probe { broken: true, ..Probe::default() });
        let slice = DownloadSlice::new(probe.clone());
        let err = slice.handle("/k").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
        assert_eq!(probe.value_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_uses_request_path() {
        let storage = seeded(&[("tarballs/decimal-2.0.0.tar", &[9])]).await;
        let handler = DownloadSlice::new(storage).into_handler().into_boxed_handler();
        let res = handler
            .call(Request::test(Method::Get, "/tarballs/decimal-2.0.0.tar?download=1"))
            .await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), &[9]);
    }
}
