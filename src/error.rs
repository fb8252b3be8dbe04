//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// `NotFound` is a normal miss, not a failure. Capacity pressure is never
/// surfaced as an error; it is resolved internally through eviction.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in the cache (normal miss)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Underlying store unavailable or a read/write failed
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization failure: {0}")]
    Serialization(String),
}

impl CacheError {
    /// True when the error is an ordinary miss rather than a failure.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
