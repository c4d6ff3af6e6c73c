// src/models/document.rs
//! Document attestation records.
//!
//! An attestation claims that a content handle points to a document of a
//! given kind uploaded by a given subject. The authority never reads the
//! content itself; the handle is opaque.

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

/// Attestation stored per content handle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentAttestation {
    pub handle: String,
    /// Free-form classification tag, e.g. "AADHAAR" or "PAN".
    pub kind: String,
    pub uploaded_at: u64,
    pub expires_at: u64,
    pub active: bool,
    pub uploaded_by: Address,
    pub verified_by: Option<Address>,
    pub verified_at: Option<u64>,
}

/// Lifecycle state derived from the stored fields and the current time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Uploaded,
    Verified,
    Expired,
    Deactivated,
}

/// Tuple view returned by document lookups: kind, upload time, expiry,
/// active flag and uploader.
pub type DocumentInfo = (String, u64, u64, bool, Address);

impl DocumentAttestation {
    pub fn new(handle: String, kind: String, uploaded_at: u64, expires_at: u64, uploaded_by: Address) -> Self {
        DocumentAttestation {
            handle,
            kind,
            uploaded_at,
            expires_at,
            active: true,
            uploaded_by,
            verified_by: None,
            verified_at: None,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }

    /// Expiry is computed, never stored: an active attestation past its
    /// expiry is treated as expired while `active` stays untouched.
    pub fn is_expired(&self, now: u64) -> bool {
        self.active && now > self.expires_at
    }

    pub fn status(&self, now: u64) -> DocumentStatus {
        if !self.active {
            DocumentStatus::Deactivated
        } else if self.is_verified() {
            DocumentStatus::Verified
        } else if self.is_expired(now) {
            DocumentStatus::Expired
        } else {
            DocumentStatus::Uploaded
        }
    }

    pub fn info(&self) -> DocumentInfo {
        (
            self.kind.clone(),
            self.uploaded_at,
            self.expires_at,
            self.active,
            self.uploaded_by,
        )
    }
}
