// src/storage/ipfs_client.rs
//! IPFS storage client for document content.
//!
//! Backs the [`ContentStore`] interface with an IPFS node's HTTP API:
//! - `put` adds the bytes and returns the CID
//! - `get` streams the content back by CID
//! - `unpin` removes the pin so the node may garbage-collect it
//!
//! # Security Considerations
//! - All stored data is public by default (IPFS is a public network)
//! - For private data, encrypt before storage

use crate::error::StorageError;
use crate::storage::content_store::ContentStore;
use bytes::BytesMut;
use futures::TryStreamExt;
use ipfs_api_backend_hyper::{IpfsApi, IpfsClient, TryFromUri};
use std::io::Cursor;
use std::sync::Arc;

/// Default IPFS API endpoint of a local node.
pub const DEFAULT_IPFS_API_URL: &str = "http://localhost:5001";

/// Thread-safe IPFS client wrapper.
#[derive(Clone)]
pub struct IpfsStorage {
    /// Shared IPFS client instance (thread-safe via Arc)
    client: Arc<IpfsClient>,
}

impl IpfsStorage {
    /// Creates a client for the local IPFS node at `http://localhost:5001`.
    ///
    /// Connection errors surface on the first operation, not here.
    pub fn new() -> Self {
        IpfsStorage {
            client: Arc::new(IpfsClient::default()),
        }
    }

    /// Creates a client for the IPFS API at `api_url`.
    ///
    /// # Errors
    /// Returns [`StorageError::Endpoint`] if the URL cannot be parsed.
    pub fn with_api_url(api_url: &str) -> Result<Self, StorageError> {
        let client = <IpfsClient as TryFromUri>::from_str(api_url)
            .map_err(|e| StorageError::Endpoint(format!("{}: {}", api_url, e)))?;
        Ok(IpfsStorage {
            client: Arc::new(client),
        })
    }
}

impl Default for IpfsStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for IpfsStorage {
    async fn put(&self, data: &[u8]) -> Result<String, StorageError> {
        let reader = Cursor::new(data.to_vec());
        let res = self
            .client
            .add(reader)
            .await
            .map_err(|e| StorageError::Ipfs(e.to_string()))?;
        log::debug!("stored {} bytes at {}", data.len(), res.hash);
        Ok(res.hash)
    }

    async fn get(&self, handle: &str) -> Result<Vec<u8>, StorageError> {
        let data = self
            .client
            .cat(handle)
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .map_err(|e| StorageError::Ipfs(e.to_string()))?;
        Ok(data.to_vec())
    }

    async fn unpin(&self, handle: &str) -> Result<bool, StorageError> {
        let res = self
            .client
            .pin_rm(handle, true)
            .await
            .map_err(|e| StorageError::Ipfs(e.to_string()))?;
        Ok(res.pins.iter().any(|pin| pin == handle))
    }
}
