//! Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can storage answer a lookup? Failure → pulled from load-balancer. |

use std::sync::Arc;

use tracing::warn;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::storage::{Key, Storage};

/// Liveness probe. Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe: `200 "ready"` when `storage` answers an existence check,
/// `503` when the check faults. Whether the probe key exists is irrelevant.
pub fn readiness(storage: Arc<dyn Storage>) -> impl Handler {
    move |_req: Request| {
        let storage = Arc::clone(&storage);
        async move {
            match storage.exists(&Key::new(".readyz")).await {
                Ok(_) => Response::text("ready"),
                Err(e) => {
                    warn!(error = %e, "storage not ready");
                    Response::status(Status::ServiceUnavailable)
                }
            }
        }
    }
}
