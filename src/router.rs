//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A method may also carry a
//! fallback handler that receives every path no route claims, which is how an
//! artifact repository serves an open-ended key space.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallbacks: HashMap<Method, BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), fallbacks: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax, catch-alls `{*name}`:
    ///
    /// ```rust,no_run
    /// # use hexd::{Method, Request, Response, Router};
    /// # async fn tarball(_: Request) -> Response { Response::text("") }
    /// Router::new().on(Method::Get, "/tarballs/{*name}", tarball);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or conflicts with an
    /// existing route for the same method.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::Get, …)`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Register the handler for `method` requests that match no route.
    /// A later call replaces the earlier fallback.
    pub fn fallback(mut self, method: Method, handler: impl Handler) -> Self {
        self.fallbacks.insert(method, handler.into_boxed_handler());
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let routed = self.routes.get(&method).and_then(|tree| tree.at(path).ok());
        if let Some(matched) = routed {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Some((Arc::clone(matched.value), params));
        }
        self.fallbacks
            .get(&method)
            .map(|handler| (Arc::clone(handler), HashMap::new()))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
