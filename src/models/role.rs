// src/models/role.rs
//! Capability roles held by subjects.

use crate::utils::crypto::hash_data;
use ethers_core::types::H256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A capability tag. A subject may hold any combination of roles; holding
/// `Admin` does not imply `Verifier` or `User`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Verifier,
    User,
    ServiceProvider,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Verifier, Role::User, Role::ServiceProvider];

    /// Canonical role name as published to external callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN_ROLE",
            Role::Verifier => "VERIFIER_ROLE",
            Role::User => "USER_ROLE",
            Role::ServiceProvider => "SERVICE_PROVIDER_ROLE",
        }
    }

    /// 32-byte role identifier: Keccak-256 of the canonical name.
    pub fn id(&self) -> H256 {
        H256::from(hash_data(self.as_str().as_bytes()))
    }

    /// Looks a role up by its published identifier.
    pub fn from_id(id: H256) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.id() == id)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts `ADMIN` or `ADMIN_ROLE`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_suffix("_ROLE").unwrap_or(&upper);
        match name {
            "ADMIN" => Ok(Role::Admin),
            "VERIFIER" => Ok(Role::Verifier),
            "USER" => Ok(Role::User),
            "SERVICE_PROVIDER" => Ok(Role::ServiceProvider),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}
