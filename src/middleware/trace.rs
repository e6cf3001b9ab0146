//! Per-request tracing.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{Instrument, info, info_span, warn};

use crate::handler::Handler;
use crate::request::Request;

/// Wraps `handler` in a `request` span carrying method and path, and emits
/// one event per request with the response status and latency.
///
/// Server errors are logged at `warn`, everything else at `info`.
pub fn trace(handler: impl Handler) -> impl Handler {
    let inner = handler.into_boxed_handler();
    move |req: Request| {
        let inner = Arc::clone(&inner);
        let span = info_span!("request", method = %req.method(), path = %req.path());
        async move {
            let started = Instant::now();
            let res = inner.call(req).await;
            let status = u16::from(res.status_code());
            let latency_ms = millis(started.elapsed());
            if status >= 500 {
                warn!(status, latency_ms, "request failed");
            } else {
                info!(status, latency_ms, "request completed");
            }
            res
        }
        .instrument(span)
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::response::Response;
    use crate::status::Status;

    async fn teapot(req: Request) -> Response {
        Response::text(req.path().to_owned())
    }

    async fn broken(_: Request) -> Status {
        Status::InternalServerError
    }

    #[tokio::test]
    async fn passes_response_through_untouched() {
        let handler = trace(teapot).into_boxed_handler();
        let res = handler.call(Request::test(Method::Get, "/healthz")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.body(), b"/healthz");
    }

    #[tokio::test]
    async fn keeps_error_status() {
        let handler = trace(broken).into_boxed_handler();
        let res = handler.call(Request::test(Method::Get, "/x")).await;
        assert_eq!(res.status_code(), Status::InternalServerError);
    }

    #[test]
    fn latency_saturates_instead_of_wrapping() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }
}
