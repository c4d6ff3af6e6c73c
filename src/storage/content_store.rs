// src/storage/content_store.rs
//! Content store interface consumed by clients of the authority.
//!
//! Document bytes live outside the authority. A client stores the bytes,
//! gets a handle back, and passes only the handle to `upload_document`.
//! The authority itself never calls a store.

use crate::error::StorageError;
use crate::utils::crypto::hash_data;
use ethers_core::utils::hex;
use std::collections::HashMap;
use std::sync::Mutex;

/// Content-addressed storage: put bytes, get a handle; fetch by handle;
/// unpin a handle so the store may evict it.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    async fn put(&self, data: &[u8]) -> Result<String, StorageError>;

    async fn get(&self, handle: &str) -> Result<Vec<u8>, StorageError>;

    /// Returns `true` when the handle was pinned and is now released.
    async fn unpin(&self, handle: &str) -> Result<bool, StorageError>;
}

/// In-process content store keyed by the Keccak-256 of the content.
#[derive(Default)]
pub struct MemoryContentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        MemoryContentStore::default()
    }

    /// Handle for `data`; identical content always maps to the same handle.
    pub fn handle_for(data: &[u8]) -> String {
        format!("mem-{}", hex::encode(hash_data(data)))
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for MemoryContentStore {
    async fn put(&self, data: &[u8]) -> Result<String, StorageError> {
        let handle = Self::handle_for(data);
        let mut blobs = self.blobs.lock().map_err(|_| StorageError::Poisoned)?;
        blobs.insert(handle.clone(), data.to_vec());
        Ok(handle)
    }

    async fn get(&self, handle: &str) -> Result<Vec<u8>, StorageError> {
        let blobs = self.blobs.lock().map_err(|_| StorageError::Poisoned)?;
        blobs
            .get(handle)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(handle.to_string()))
    }

    async fn unpin(&self, handle: &str) -> Result<bool, StorageError> {
        let mut blobs = self.blobs.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(blobs.remove(handle).is_some())
    }
}
