// src/error.rs
//! Error types for the identity authority.
//!
//! Every rejection is a normal, expected outcome reported to the immediate
//! caller. A failed operation never leaves partial state behind.

use crate::models::role::Role;
use ethers_core::types::Address;
use thiserror::Error;

/// Errors returned by authority operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Caller does not hold the role the operation requires.
    #[error("account {caller:?} is missing role {role}")]
    Unauthorized { caller: Address, role: Role },

    /// The authority is paused and rejects every mutating call.
    #[error("authority is paused")]
    Paused,

    /// `unpause` was called while the authority was running.
    #[error("authority is not paused")]
    NotPaused,

    /// Unknown handle or subject.
    #[error("not found: {0}")]
    NotFound(String),

    /// Configuration values out of range.
    #[error("invalid system config: {0}")]
    InvalidConfig(String),

    /// Document expiry is not strictly after the upload time.
    #[error("expiry {expiry} must be after current time {now}")]
    InvalidExpiry { expiry: u64, now: u64 },

    /// Empty handle or document kind.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Handle is taken by an active, verified or foreign attestation.
    #[error("handle {0} is already attested")]
    DuplicateHandle(String),

    /// Subject already has a DID record and multiple records are disabled.
    #[error("subject {subject:?} already holds a DID; cannot open another for kind {kind}")]
    DuplicateIdentity { subject: Address, kind: String },

    /// Attestation expired before it was verified.
    #[error("document {handle} expired at {expiry}")]
    Expired { handle: String, expiry: u64 },

    /// Attestation was deactivated by an administrator.
    #[error("document {0} has been deactivated")]
    DocumentInactive(String),

    /// Signature bytes could not be parsed.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Caller already submitted the configured number of consecutive
    /// invalid proofs for this subject.
    #[error("too many invalid proofs for subject {subject:?} (limit {limit})")]
    AttemptsExceeded { subject: Address, limit: u32 },

    /// Revoking the role would leave the authority without an admin.
    #[error("cannot revoke the last remaining admin")]
    LastAdmin,
}

/// Result alias used by every authority operation.
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Errors raised by content store adapters.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("content not found: {0}")]
    NotFound(String),

    #[error("ipfs request failed: {0}")]
    Ipfs(String),

    #[error("content store lock poisoned")]
    Poisoned,

    #[error("invalid endpoint: {0}")]
    Endpoint(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("payload is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
