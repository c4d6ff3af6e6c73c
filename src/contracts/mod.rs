// src/contracts/mod.rs
//! Authority components.
//!
//! Each component owns one slice of state and enforces its own
//! authorization through [`role_authority::RoleAuthority`]. Cross-component
//! transactions are composed by [`crate::services::authority`].

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

pub mod document_store;
pub mod identity_registry;
pub mod role_authority;
pub mod system_config;

/// Execution context of one operation: the authenticated caller and the
/// timestamp the operation is applied at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub timestamp: u64,
}

impl CallContext {
    pub fn new(caller: Address, timestamp: u64) -> Self {
        CallContext { caller, timestamp }
    }
}
