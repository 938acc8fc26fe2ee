//! Shared error scaffolding, modeled after the `{kind, source}` error shape
//! used throughout the debuginfo crates this workspace draws on.

use std::error::Error as StdError;
use std::fmt;

/// A boxed, thread-safe error source.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A generic wrapper pairing a caller-defined `kind` with an optional
/// underlying cause, for crates whose error enum doesn't need its own
/// hand-rolled `Display` impl.
#[derive(Debug)]
pub struct WrappedError<K> {
    kind: K,
    source: Option<BoxError>,
}

impl<K: fmt::Display> fmt::Display for WrappedError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl<K: fmt::Debug + fmt::Display> StdError for WrappedError<K> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|b| b.as_ref() as &(dyn StdError + 'static))
    }
}

impl<K> WrappedError<K> {
    pub fn new(kind: K, source: impl Into<BoxError>) -> Self {
        WrappedError {
            kind,
            source: Some(source.into()),
        }
    }

    pub fn bare(kind: K) -> Self {
        WrappedError { kind, source: None }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }
}
