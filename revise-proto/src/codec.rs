//! Serialization of entity collections for durable storage.
//!
//! A stored value is a JSON array holding every entity of one collection
//! (all projects or all tasks of one user) with camelCase field names.
//! Decoding an encoded collection yields an element-wise equal collection.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for collection encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The collection could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
    /// The stored value is not a valid collection.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Encodes a collection of entities as a JSON array.
///
/// # Errors
///
/// Returns `CodecError::Encode` if an entity cannot be serialized.
pub fn encode<T: Serialize>(items: &[T]) -> Result<String, CodecError> {
    serde_json::to_string(items).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decodes a JSON array back into a collection of entities.
///
/// # Errors
///
/// Returns `CodecError::Decode` if the input is not a JSON array of `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, CodecError> {
    serde_json::from_str(raw).map_err(|e| CodecError::Decode(e.to_string()))
}
