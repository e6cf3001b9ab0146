//! Storage keys.

use std::fmt;

/// Identifier of a stored artifact.
///
/// A key is an opaque, path-like string. It is never normalized: whatever
/// the caller hands in is what the storage backend sees.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives the key for a (percent-decoded) request path by dropping its
    /// first character, whatever that character is.
    ///
    /// `/packages/decimal` becomes `packages/decimal`; `a/b/c` becomes `/b/c`;
    /// the empty path yields the empty key.
    pub fn from_request_path(path: &str) -> Self {
        let mut chars = path.chars();
        chars.next();
        Self(chars.as_str().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
