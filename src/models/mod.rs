// src/models/mod.rs
//! Data structures shared by the authority components.

pub mod config;
pub mod did;
pub mod document;
pub mod event;
pub mod role;
pub mod verifier;
