// src/storage/mod.rs
//! External content store adapters.

pub mod content_store;
pub mod ipfs_client;
