// src/contracts/document_store.rs
//! Document attestations keyed by content handle.
//!
//! Lifecycle per handle:
//!
//! ```text
//! Uploaded ──verify──▶ Verified
//!    │
//!    ├── now > expiry ──▶ Expired      (derived, nothing is written)
//!    │
//!    └──deactivate──▶ Deactivated      (admin; also from Verified)
//! ```
//!
//! Verification itself is split into a read-only check and an infallible
//! commit so the caller can validate the identity registry in between and
//! apply both updates together.

use crate::contracts::role_authority::RoleAuthority;
use crate::contracts::CallContext;
use crate::error::{IdentityError, Result};
use crate::models::config::SystemConfig;
use crate::models::document::{DocumentAttestation, DocumentInfo, DocumentStatus};
use crate::models::role::Role;
use ethers_core::types::Address;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: HashMap<String, DocumentAttestation>,
}

impl DocumentStore {
    pub fn new() -> Self {
        DocumentStore::default()
    }

    /// Records an attestation for `handle` owned by the caller.
    ///
    /// # Arguments
    /// * `ctx` - Uploading user and upload time
    /// * `roles` - Role graph used for the pause and `User` checks
    /// * `config` - Current configuration, for the expiry window
    /// * `handle` - Content handle of the stored document
    /// * `kind` - Document kind, e.g. `AADHAAR`
    /// * `expiry` - Requested expiry timestamp
    ///
    /// # Returns
    /// The stored attestation.
    ///
    /// `expiry` must be after the current time; it is stored clamped to
    /// `now + document_expiry_time`.
    ///
    /// A handle is taken once uploaded. The only exception is a deactivated,
    /// never verified attestation, which its own uploader may replace. A
    /// verified attestation stays on record because DID records cite it.
    pub fn upload_document(
        &mut self,
        ctx: &CallContext,
        roles: &RoleAuthority,
        config: &SystemConfig,
        handle: &str,
        kind: &str,
        expiry: u64,
    ) -> Result<&DocumentAttestation> {
        roles.authorize(ctx, Role::User)?;

        if handle.trim().is_empty() {
            return Err(IdentityError::InvalidDocument("content handle is empty".into()));
        }
        if kind.trim().is_empty() {
            return Err(IdentityError::InvalidDocument("document kind is empty".into()));
        }
        let now = ctx.timestamp;
        if expiry <= now {
            return Err(IdentityError::InvalidExpiry { expiry, now });
        }
        if let Some(prev) = self.documents.get(handle) {
            if prev.active || prev.is_verified() || prev.uploaded_by != ctx.caller {
                log::warn!("upload of {} by {:?} rejected: handle taken", handle, ctx.caller);
                return Err(IdentityError::DuplicateHandle(handle.to_string()));
            }
        }

        let expires_at = expiry.min(now.saturating_add(config.document_expiry_time));
        if expires_at < expiry {
            log::debug!("expiry for {} clamped from {} to {}", handle, expiry, expires_at);
        }

        let attestation = DocumentAttestation::new(handle.to_string(), kind.to_string(), now, expires_at, ctx.caller);
        log::info!("document {} ({}) uploaded by {:?}", handle, kind, ctx.caller);
        self.documents.insert(handle.to_string(), attestation);
        self.get_document(handle)
    }

    /// Full attestation stored for `handle`.
    ///
    /// # Arguments
    /// * `handle` - Content handle returned by the content store
    ///
    /// # Returns
    /// - `Ok(&DocumentAttestation)` for a known handle
    /// - `Err(IdentityError::NotFound)` for an unknown one
    pub fn get_document(&self, handle: &str) -> Result<&DocumentAttestation> {
        self.documents
            .get(handle)
            .ok_or_else(|| IdentityError::NotFound(format!("document {}", handle)))
    }

    /// Kind, upload time, expiry, active flag and uploader.
    pub fn document_info(&self, handle: &str) -> Result<DocumentInfo> {
        self.get_document(handle).map(DocumentAttestation::info)
    }

    /// Lifecycle state of `handle` as of `now`.
    pub fn document_status(&self, handle: &str, now: u64) -> Result<DocumentStatus> {
        self.get_document(handle).map(|doc| doc.status(now))
    }

    /// Attestations uploaded by `owner`, ordered by upload time.
    pub fn documents_of(&self, owner: Address) -> Vec<&DocumentAttestation> {
        let mut docs: Vec<_> = self
            .documents
            .values()
            .filter(|doc| doc.uploaded_by == owner)
            .collect();
        docs.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then_with(|| a.handle.cmp(&b.handle)));
        docs
    }

    /// Read-only half of verification: caller must be a verifier, the
    /// handle must exist, be active and not expired.
    pub fn check_verifiable(
        &self,
        ctx: &CallContext,
        roles: &RoleAuthority,
        handle: &str,
    ) -> Result<&DocumentAttestation> {
        roles.authorize(ctx, Role::Verifier)?;
        let doc = self.get_document(handle)?;
        if !doc.active {
            return Err(IdentityError::DocumentInactive(handle.to_string()));
        }
        if doc.is_expired(ctx.timestamp) {
            log::warn!("verification of {} rejected: expired at {}", handle, doc.expires_at);
            return Err(IdentityError::Expired {
                handle: handle.to_string(),
                expiry: doc.expires_at,
            });
        }
        Ok(doc)
    }

    /// Commit half of verification. Returns `false` if the handle was
    /// already verified, in which case nothing changes.
    pub(crate) fn mark_verified(&mut self, handle: &str, verifier: Address, now: u64) -> bool {
        match self.documents.get_mut(handle) {
            Some(doc) if !doc.is_verified() => {
                doc.verified_by = Some(verifier);
                doc.verified_at = Some(now);
                log::info!("document {} verified by {:?}", handle, verifier);
                true
            }
            _ => false,
        }
    }

    /// Sets `active = false`. Returns whether the flag changed.
    pub fn deactivate_document(&mut self, ctx: &CallContext, roles: &RoleAuthority, handle: &str) -> Result<bool> {
        roles.authorize(ctx, Role::Admin)?;
        let doc = self
            .documents
            .get_mut(handle)
            .ok_or_else(|| IdentityError::NotFound(format!("document {}", handle)))?;
        if !doc.active {
            return Ok(false);
        }
        doc.active = false;
        log::info!("document {} deactivated by {:?}", handle, ctx.caller);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
