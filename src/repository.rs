//! Router assembly for one artifact repository.

use std::sync::Arc;

use crate::download::DownloadSlice;
use crate::health;
use crate::method::Method;
use crate::middleware;
use crate::router::Router;
use crate::storage::Storage;

/// Builds the router for a repository backed by `storage`.
///
/// `/healthz` and `/readyz` are probes; every other `GET` is an artifact
/// download. Other methods on artifact paths get `404`: publishing and
/// authentication belong in front of this server, not in it.
pub fn repository(storage: Arc<dyn Storage>) -> Router {
    Router::new()
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness(Arc::clone(&storage)))
        .fallback(Method::Get, middleware::trace(DownloadSlice::new(storage).into_handler()))
}
