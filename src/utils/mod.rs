// src/utils/mod.rs
//! Helper functions.

pub mod crypto;
pub mod logging;
pub mod serialization;
pub mod time;
