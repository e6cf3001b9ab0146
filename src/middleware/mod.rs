//! Middleware layer.
//!
//! Middleware wraps a [`Handler`] in another handler, so it composes at
//! registration time: `router.get("/x", middleware::trace(handler))`.

mod trace;

pub use trace::trace;
