//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use percent_encoding::percent_decode_str;

use crate::method::Method;

/// An incoming HTTP request, with its body fully collected.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) raw_path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, method: Method, body: Bytes) -> Self {
        let raw_path = parts.uri.path();
        Self {
            method,
            path: percent_decode_str(raw_path).decode_utf8_lossy().into_owned(),
            raw_path: raw_path.to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
            params: HashMap::new(),
        }
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> Method { self.method }

    /// The percent-decoded request path. `+` stays literal; invalid UTF-8
    /// after decoding is replaced with U+FFFD.
    pub fn path(&self) -> &str { &self.path }

    /// The request path exactly as it appeared on the request line.
    pub fn raw_path(&self) -> &str { &self.raw_path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/packages/{name}`, `req.param("name")` on `/packages/decimal`
    /// returns `Some("decimal")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl Request {
    /// Builds a body-less request for handler tests.
    pub(crate) fn test(method: Method, uri: &str) -> Self {
        let (parts, ()) = http::Request::builder()
            .method(method.as_str())
            .uri(uri)
            .body(())
            .expect("valid test request")
            .into_parts();
        Self::new(parts, method, Bytes::new())
    }
}
