// src/services/authority.rs
//! Identity authority: the composed state machine.
//!
//! Owns the role graph, configuration, document store, identity registry
//! and event log, and exposes every entry point. Each method is one
//! transaction: all checks run before the first write, so a rejected call
//! leaves every component and the event log untouched.
//!
//! ## Operation Surface
//! - Roles: `register_verifier`, `register_user`, `grant_role`, `revoke_role`,
//!   `has_role`, `verify_zkp`, `get_verifier_stats`, `pause`, `unpause`
//! - Configuration: `update_system_config`, `config`
//! - Documents: `upload_document`, `get_document`, `verify_document`,
//!   `deactivate_document`
//! - Identity: `get_did`, `get_did_for_kind`, `revoke_did`

use crate::contracts::document_store::DocumentStore;
use crate::contracts::identity_registry::IdentityRegistry;
use crate::contracts::role_authority::RoleAuthority;
use crate::contracts::system_config::SystemConfigStore;
use crate::contracts::CallContext;
use crate::error::Result;
use crate::models::config::SystemConfig;
use crate::models::did::{DidRecord, DidView};
use crate::models::document::{DocumentAttestation, DocumentInfo, DocumentStatus};
use crate::models::event::{EventLog, EventRecord, IdentityEvent};
use crate::models::role::Role;
use crate::models::verifier::{VerifierProfile, VerifierStats};
use ethers_core::types::{Address, H256};

#[derive(Debug, Clone)]
pub struct IdentityAuthority {
    roles: RoleAuthority,
    config: SystemConfigStore,
    documents: DocumentStore,
    registry: IdentityRegistry,
    events: EventLog,
}

impl IdentityAuthority {
    /// Creates an authority administered by `deployer`.
    pub fn new(deployer: Address, config: SystemConfig) -> Result<Self> {
        Ok(IdentityAuthority {
            roles: RoleAuthority::new(deployer),
            config: SystemConfigStore::new(config)?,
            documents: DocumentStore::new(),
            registry: IdentityRegistry::new(),
            events: EventLog::new(),
        })
    }

    /// Creates an authority with [`SystemConfig::default`].
    pub fn with_defaults(deployer: Address) -> Self {
        IdentityAuthority {
            roles: RoleAuthority::new(deployer),
            config: SystemConfigStore::default(),
            documents: DocumentStore::new(),
            registry: IdentityRegistry::new(),
            events: EventLog::new(),
        }
    }

    fn emit(&mut self, ctx: &CallContext, event: IdentityEvent) {
        self.events.append(ctx.timestamp, ctx.caller, event);
    }

    // ========== Roles ==========

    pub fn register_verifier(
        &mut self,
        ctx: &CallContext,
        subject: Address,
        name: &str,
        organization: &str,
    ) -> Result<()> {
        self.roles.register_verifier(ctx, subject, name, organization)?;
        self.emit(
            ctx,
            IdentityEvent::VerifierRegistered {
                subject,
                name: name.to_string(),
                organization: organization.to_string(),
            },
        );
        Ok(())
    }

    pub fn register_user(&mut self, ctx: &CallContext, subject: Address) -> Result<()> {
        self.roles.register_user(ctx, subject)?;
        self.emit(ctx, IdentityEvent::UserRegistered { subject });
        Ok(())
    }

    pub fn grant_role(&mut self, ctx: &CallContext, role: Role, subject: Address) -> Result<()> {
        if self.roles.grant_role(ctx, role, subject)? {
            self.emit(ctx, IdentityEvent::RoleGranted { role, subject });
        }
        Ok(())
    }

    pub fn revoke_role(&mut self, ctx: &CallContext, role: Role, subject: Address) -> Result<()> {
        if self.roles.revoke_role(ctx, role, subject)? {
            self.emit(ctx, IdentityEvent::RoleRevoked { role, subject });
        }
        Ok(())
    }

    pub fn has_role(&self, role: Role, subject: Address) -> bool {
        self.roles.has_role(role, subject)
    }

    pub fn roles_of(&self, subject: Address) -> Vec<Role> {
        self.roles.roles_of(subject)
    }

    pub fn admin_count(&self) -> usize {
        self.roles.admin_count()
    }

    /// Verifies a signed proof for `subject`. `Ok(false)` is a negative
    /// verification result, not a failure.
    pub fn verify_zkp(
        &mut self,
        ctx: &CallContext,
        subject: Address,
        fingerprint: H256,
        signature: &[u8],
    ) -> Result<bool> {
        let limit = self.config.config().max_verification_attempts;
        let success = self.roles.verify_zkp(ctx, subject, fingerprint, signature, limit)?;
        self.emit(
            ctx,
            IdentityEvent::ProofVerified {
                verifier: ctx.caller,
                subject,
                fingerprint,
                success,
            },
        );
        Ok(success)
    }

    pub fn get_verifier_stats(&self, subject: Address) -> VerifierStats {
        self.roles.verifier_stats(subject)
    }

    pub fn verifier_profile(&self, subject: Address) -> Option<&VerifierProfile> {
        self.roles.verifier_profile(subject)
    }

    pub fn failed_attempts(&self, verifier: Address, subject: Address) -> u32 {
        self.roles.failed_attempts(verifier, subject)
    }

    pub fn pause(&mut self, ctx: &CallContext) -> Result<()> {
        self.roles.pause(ctx)?;
        self.emit(ctx, IdentityEvent::Paused);
        Ok(())
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> Result<()> {
        self.roles.unpause(ctx)?;
        self.emit(ctx, IdentityEvent::Unpaused);
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.roles.is_paused()
    }

    // ========== Configuration ==========

    pub fn update_system_config(&mut self, ctx: &CallContext, config: SystemConfig) -> Result<()> {
        self.config.update_system_config(ctx, &self.roles, config.clone())?;
        self.emit(ctx, IdentityEvent::ConfigUpdated { config });
        Ok(())
    }

    pub fn config(&self) -> &SystemConfig {
        self.config.config()
    }

    // ========== Documents ==========

    /// Records an attestation for `handle`. Returns the stored expiry, which
    /// may be earlier than requested when clamped to the configured window.
    pub fn upload_document(&mut self, ctx: &CallContext, handle: &str, kind: &str, expiry: u64) -> Result<u64> {
        let doc = self
            .documents
            .upload_document(ctx, &self.roles, self.config.config(), handle, kind, expiry)?;
        let expires_at = doc.expires_at;
        self.emit(
            ctx,
            IdentityEvent::DocumentUploaded {
                handle: handle.to_string(),
                kind: kind.to_string(),
                owner: ctx.caller,
                expires_at,
            },
        );
        Ok(expires_at)
    }

    pub fn get_document(&self, handle: &str) -> Result<DocumentInfo> {
        self.documents.document_info(handle)
    }

    pub fn attestation(&self, handle: &str) -> Result<&DocumentAttestation> {
        self.documents.get_document(handle)
    }

    pub fn document_status(&self, handle: &str, now: u64) -> Result<DocumentStatus> {
        self.documents.document_status(handle, now)
    }

    pub fn documents_of(&self, owner: Address) -> Vec<&DocumentAttestation> {
        self.documents.documents_of(owner)
    }

    /// Marks `handle` verified and folds it into the uploader's DID in one
    /// step. Document and registry are both validated before either is
    /// written. Verifying an already verified handle succeeds without
    /// changes.
    ///
    /// # Arguments
    /// * `ctx` - Calling verifier and verification time
    /// * `handle` - Content handle of an uploaded document
    ///
    /// # Errors
    /// - `Paused`, or `Unauthorized` if the caller is not a verifier
    /// - `NotFound` for an unknown handle
    /// - `DocumentInactive` or `Expired` for a deactivated or lapsed attestation
    /// - `DuplicateIdentity` when the uploader already holds a DID of another
    ///   kind and multiple DIDs are disabled
    pub fn verify_document(&mut self, ctx: &CallContext, handle: &str) -> Result<()> {
        let doc = self.documents.check_verifiable(ctx, &self.roles, handle)?;
        let owner = doc.uploaded_by;
        let kind = doc.kind.clone();
        let allow_multiple = self.config.config().allow_multiple_dids;
        self.registry.check_attach(owner, &kind, allow_multiple)?;

        if !self.documents.mark_verified(handle, ctx.caller, ctx.timestamp) {
            return Ok(());
        }
        let created = self.registry.attach(owner, &kind, handle, ctx.timestamp);
        self.emit(
            ctx,
            IdentityEvent::DocumentVerified {
                handle: handle.to_string(),
                owner,
            },
        );
        if created {
            self.emit(ctx, IdentityEvent::DidCreated { subject: owner, kind });
        }
        Ok(())
    }

    pub fn deactivate_document(&mut self, ctx: &CallContext, handle: &str) -> Result<()> {
        if self.documents.deactivate_document(ctx, &self.roles, handle)? {
            self.emit(
                ctx,
                IdentityEvent::DocumentDeactivated {
                    handle: handle.to_string(),
                },
            );
        }
        Ok(())
    }

    // ========== Identity ==========

    pub fn get_did(&self, subject: Address) -> Result<DidView> {
        self.registry.get_did(subject)
    }

    pub fn get_did_for_kind(&self, subject: Address, kind: &str) -> Result<&DidRecord> {
        self.registry.get_did_for_kind(subject, kind)
    }

    pub fn revoke_did(&mut self, ctx: &CallContext, subject: Address) -> Result<()> {
        self.registry.revoke_did(ctx, &self.roles, subject)?;
        self.emit(ctx, IdentityEvent::DidRevoked { subject });
        Ok(())
    }

    // ========== Ledger ==========

    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }

    /// Hash of the latest event, zero before any mutation.
    pub fn ledger_head(&self) -> H256 {
        self.events.head()
    }
}
