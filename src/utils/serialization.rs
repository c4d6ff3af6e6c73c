// src/utils/serialization.rs
//! Serialization utilities for the identity authority.
//!
//! Provides JSON helpers for records and for structured payloads exchanged
//! with a [`ContentStore`].

use crate::error::StorageError;
use crate::storage::content_store::ContentStore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Serializes a value to a JSON string.
pub fn serialize<T: Serialize>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

/// Deserializes a value from a JSON string.
pub fn deserialize<'a, T: Deserialize<'a>>(data: &'a str) -> Result<T, serde_json::Error> {
    serde_json::from_str(data)
}

/// Stores a JSON-serializable object and returns its handle.
pub async fn store_json<S, T>(store: &S, obj: &T) -> Result<String, StorageError>
where
    S: ContentStore,
    T: Serialize,
{
    let json_str = serialize(obj)?;
    store.put(json_str.as_bytes()).await
}

/// Retrieves and deserializes a JSON object by handle.
pub async fn retrieve_json<S, T>(store: &S, handle: &str) -> Result<T, StorageError>
where
    S: ContentStore,
    T: DeserializeOwned,
{
    let bytes = store.get(handle).await?;
    let json_str = String::from_utf8(bytes)?;
    Ok(deserialize(&json_str)?)
}
