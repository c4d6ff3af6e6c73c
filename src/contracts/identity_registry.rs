// src/contracts/identity_registry.rs
//! Per-subject DID records aggregated from verified attestations.
//!
//! With multiple DIDs disabled a subject holds at most one record, opened
//! under the kind of the first verified document; verifying a document of a
//! different kind for that subject is rejected. With multiple DIDs enabled
//! records are keyed by document kind.

use crate::contracts::role_authority::RoleAuthority;
use crate::contracts::CallContext;
use crate::error::{IdentityError, Result};
use crate::models::did::{DidRecord, DidView};
use crate::models::role::Role;
use ethers_core::types::Address;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct IdentityRegistry {
    /// Records per subject in creation order.
    records: HashMap<Address, Vec<DidRecord>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        IdentityRegistry::default()
    }

    /// Aggregate view over every record of `subject`.
    ///
    /// # Errors
    /// [`IdentityError::NotFound`] if no record was ever opened.
    pub fn get_did(&self, subject: Address) -> Result<DidView> {
        DidView::aggregate(self.records_of(subject))
            .ok_or_else(|| IdentityError::NotFound(format!("DID for {:?}", subject)))
    }

    /// Record opened for `subject` under document `kind`.
    ///
    /// # Arguments
    /// * `subject` - Owner of the record
    /// * `kind` - Document kind the record was opened under
    ///
    /// # Returns
    /// - `Ok(&DidRecord)` if such a record exists
    /// - `Err(IdentityError::NotFound)` otherwise
    pub fn get_did_for_kind(&self, subject: Address, kind: &str) -> Result<&DidRecord> {
        self.records_of(subject)
            .iter()
            .find(|record| record.kind == kind)
            .ok_or_else(|| IdentityError::NotFound(format!("{} DID for {:?}", kind, subject)))
    }

    /// All records of `subject` in creation order; empty if none.
    pub fn records_of(&self, subject: Address) -> &[DidRecord] {
        self.records.get(&subject).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a verified `kind` document can be attached to `subject`
    /// under the current multiplicity policy. Read-only.
    pub fn check_attach(&self, subject: Address, kind: &str, allow_multiple: bool) -> Result<()> {
        let records = self.records_of(subject);
        let has_kind = records.iter().any(|record| record.kind == kind);
        if !allow_multiple && !records.is_empty() && !has_kind {
            log::warn!("second DID for {:?} under kind {} rejected", subject, kind);
            return Err(IdentityError::DuplicateIdentity {
                subject,
                kind: kind.to_string(),
            });
        }
        Ok(())
    }

    /// Attaches a verified handle, opening a record if needed. Must follow a
    /// successful [`check_attach`](Self::check_attach) with the same policy.
    /// Returns `true` when a new record was opened.
    pub(crate) fn attach(&mut self, subject: Address, kind: &str, handle: &str, now: u64) -> bool {
        let records = self.records.entry(subject).or_default();
        match records.iter_mut().find(|record| record.kind == kind) {
            Some(record) => {
                record.attest(handle, now);
                false
            }
            None => {
                let mut record = DidRecord::new(subject, kind.to_string(), now);
                record.attest(handle, now);
                records.push(record);
                log::info!("DID opened for {:?} under {}", subject, kind);
                true
            }
        }
    }

    /// Clears the verified flag on every record of `subject`. Records and
    /// handles are kept; a later verification sets the flag again.
    pub fn revoke_did(&mut self, ctx: &CallContext, roles: &RoleAuthority, subject: Address) -> Result<()> {
        roles.authorize(ctx, Role::Admin)?;
        let records = self
            .records
            .get_mut(&subject)
            .ok_or_else(|| IdentityError::NotFound(format!("DID for {:?}", subject)))?;
        for record in records.iter_mut() {
            record.verified = false;
            record.updated_at = ctx.timestamp;
        }
        log::info!("DID of {:?} revoked by {:?}", subject, ctx.caller);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::types::H160;

    const ADMIN: H160 = H160([0x01; 20]);
    const USER: H160 = H160([0x03; 20]);

    #[test]
    fn test_missing_subject_is_not_found() {
        let registry = IdentityRegistry::new();
        assert!(matches!(registry.get_did(USER), Err(IdentityError::NotFound(_))));
        assert!(registry.records_of(USER).is_empty());
    }

    #[test]
    fn test_single_did_policy() {
        let mut registry = IdentityRegistry::new();
        registry.check_attach(USER, "AADHAAR", false).unwrap();
        assert!(registry.attach(USER, "AADHAAR", "Qm1", 10));

        // Same kind appends to the existing record.
        registry.check_attach(USER, "AADHAAR", false).unwrap();
        assert!(!registry.attach(USER, "AADHAAR", "Qm2", 11));

        assert_eq!(
            registry.check_attach(USER, "PAN", false),
            Err(IdentityError::DuplicateIdentity {
                subject: USER,
                kind: "PAN".into()
            })
        );

        let view = registry.get_did(USER).unwrap();
        assert!(view.verified);
        assert_eq!(view.created_at, 10);
        assert_eq!(view.handles, vec!["Qm1".to_string(), "Qm2".to_string()]);
    }

    #[test]
    fn test_multiple_dids_keyed_by_kind() {
        let mut registry = IdentityRegistry::new();
        registry.attach(USER, "AADHAAR", "Qm1", 10);
        registry.check_attach(USER, "PAN", true).unwrap();
        assert!(registry.attach(USER, "PAN", "Qm2", 20));

        assert_eq!(registry.records_of(USER).len(), 2);
        assert_eq!(registry.get_did_for_kind(USER, "PAN").unwrap().handles, vec!["Qm2".to_string()]);
        assert!(registry.get_did_for_kind(USER, "PASSPORT").is_err());
    }

    #[test]
    fn test_revoke_clears_flag_only() {
        let roles = RoleAuthority::new(ADMIN);
        let mut registry = IdentityRegistry::new();
        registry.attach(USER, "AADHAAR", "Qm1", 10);

        assert!(matches!(
            registry.revoke_did(&CallContext::new(USER, 20), &roles, USER),
            Err(IdentityError::Unauthorized { .. })
        ));
        registry.revoke_did(&CallContext::new(ADMIN, 20), &roles, USER).unwrap();

        let view = registry.get_did(USER).unwrap();
        assert!(!view.verified);
        assert_eq!(view.handles, vec!["Qm1".to_string()]);
        assert!(matches!(
            registry.revoke_did(&CallContext::new(ADMIN, 20), &roles, ADMIN),
            Err(IdentityError::NotFound(_))
        ));
    }
}
