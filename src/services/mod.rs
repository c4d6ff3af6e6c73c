// src/services/mod.rs
//! Composed authority and its thread-safe handle.

pub mod authority;
pub mod shared;
