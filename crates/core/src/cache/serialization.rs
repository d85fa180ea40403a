//! Pure functions for serializing values to and from cache bytes.
//!
//! Cache values are JSON, which keeps entries human-readable when inspected
//! with `redis-cli` and lets any backend store them as opaque bytes.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a value to JSON bytes.
pub fn to_cache_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes produced by [`to_cache_bytes`].
pub fn from_cache_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
