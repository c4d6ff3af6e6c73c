// src/contracts/role_authority.rs
//! Role graph, delegated enrollment, proof verification and the pause switch.
//!
//! Roles are a set-valued map from subject to role set. Enrollment follows
//! a delegation chain: admins enroll verifiers, verifiers enroll users.
//! Every other assignment is admin-only.
//!
//! The pause flag lives here and is consulted first by every mutating
//! operation of every component.

use crate::contracts::CallContext;
use crate::error::{IdentityError, Result};
use crate::models::role::Role;
use crate::models::verifier::{VerifierProfile, VerifierStats};
use crate::utils::crypto::{is_signed_by, parse_signature, proof_digest};
use ethers_core::types::{Address, H256};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
pub struct RoleAuthority {
    roles: HashMap<Address, BTreeSet<Role>>,
    /// Kept after the verifier role is revoked.
    profiles: HashMap<Address, VerifierProfile>,
    /// Consecutive failed proof verifications per (verifier, subject).
    failed_attempts: HashMap<(Address, Address), u32>,
    paused: bool,
}

impl RoleAuthority {
    /// Creates the role graph with `deployer` as the only admin.
    pub fn new(deployer: Address) -> Self {
        let mut roles = HashMap::new();
        roles.insert(deployer, BTreeSet::from([Role::Admin]));
        log::info!("role authority initialized with admin {:?}", deployer);
        RoleAuthority {
            roles,
            profiles: HashMap::new(),
            failed_attempts: HashMap::new(),
            paused: false,
        }
    }

    // ========== Queries ==========

    /// Checks whether `subject` currently holds `role`.
    ///
    /// # Arguments
    /// * `role` - Role to look up
    /// * `subject` - Account being checked
    ///
    /// # Returns
    /// `true` if the role is held. Available while paused.
    pub fn has_role(&self, role: Role, subject: Address) -> bool {
        self.roles.get(&subject).map_or(false, |set| set.contains(&role))
    }

    /// Every role held by `subject`, in declaration order.
    pub fn roles_of(&self, subject: Address) -> Vec<Role> {
        self.roles
            .get(&subject)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of accounts holding `Admin`.
    pub fn admin_count(&self) -> usize {
        self.roles.values().filter(|set| set.contains(&Role::Admin)).count()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Name, organization and counters recorded for a verifier.
    pub fn verifier_profile(&self, subject: Address) -> Option<&VerifierProfile> {
        self.profiles.get(&subject)
    }

    /// Attempts and floored success percentage; zeros for unknown subjects.
    pub fn verifier_stats(&self, subject: Address) -> VerifierStats {
        self.profiles
            .get(&subject)
            .map(VerifierProfile::stats)
            .unwrap_or_default()
    }

    /// Consecutive invalid proofs `verifier` has submitted for `subject`
    /// since its last valid one.
    pub fn failed_attempts(&self, verifier: Address, subject: Address) -> u32 {
        self.failed_attempts.get(&(verifier, subject)).copied().unwrap_or(0)
    }

    // ========== Guards ==========

    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            return Err(IdentityError::Paused);
        }
        Ok(())
    }

    /// # Errors
    /// [`IdentityError::Unauthorized`] naming the missing role.
    pub fn ensure_role(&self, role: Role, caller: Address) -> Result<()> {
        if !self.has_role(role, caller) {
            log::warn!("{:?} rejected: missing {}", caller, role);
            return Err(IdentityError::Unauthorized { caller, role });
        }
        Ok(())
    }

    /// Guard for mutating operations: pause check first, then the role.
    pub fn authorize(&self, ctx: &CallContext, role: Role) -> Result<()> {
        self.ensure_not_paused()?;
        self.ensure_role(role, ctx.caller)
    }

    // ========== Enrollment ==========

    /// Enrolls `subject` as a verifier. Re-enrollment refreshes the name and
    /// organization and keeps the counters.
    ///
    /// # Arguments
    /// * `ctx` - Calling admin and time of the call
    /// * `subject` - Account receiving the verifier role
    /// * `name` - Display name of the verifier
    /// * `organization` - Organization the verifier acts for
    ///
    /// # Errors
    /// `Paused`, or `Unauthorized` if the caller is not an admin.
    pub fn register_verifier(
        &mut self,
        ctx: &CallContext,
        subject: Address,
        name: &str,
        organization: &str,
    ) -> Result<()> {
        self.authorize(ctx, Role::Admin)?;

        self.roles.entry(subject).or_default().insert(Role::Verifier);
        self.profiles
            .entry(subject)
            .and_modify(|profile| {
                profile.name = name.to_string();
                profile.organization = organization.to_string();
            })
            .or_insert_with(|| VerifierProfile::new(name.to_string(), organization.to_string(), ctx.timestamp));

        log::info!("verifier {:?} ({}) registered by {:?}", subject, organization, ctx.caller);
        Ok(())
    }

    /// Enrolls `subject` as a user. Only verifiers enroll users; holding
    /// `Admin` alone is not enough.
    pub fn register_user(&mut self, ctx: &CallContext, subject: Address) -> Result<()> {
        self.authorize(ctx, Role::Verifier)?;
        self.roles.entry(subject).or_default().insert(Role::User);
        log::info!("user {:?} registered by verifier {:?}", subject, ctx.caller);
        Ok(())
    }

    // ========== Role Administration ==========

    /// Grants `role`. Returns whether the role graph changed.
    pub fn grant_role(&mut self, ctx: &CallContext, role: Role, subject: Address) -> Result<bool> {
        self.authorize(ctx, Role::Admin)?;
        let changed = self.roles.entry(subject).or_default().insert(role);
        if changed {
            log::info!("{} granted to {:?} by {:?}", role, subject, ctx.caller);
        }
        Ok(changed)
    }

    /// Revokes `role`. Revoking an unheld role succeeds without effect.
    /// The last admin cannot be revoked.
    pub fn revoke_role(&mut self, ctx: &CallContext, role: Role, subject: Address) -> Result<bool> {
        self.authorize(ctx, Role::Admin)?;
        if !self.has_role(role, subject) {
            return Ok(false);
        }
        if role == Role::Admin && self.admin_count() == 1 {
            log::warn!("refusing to revoke last admin {:?}", subject);
            return Err(IdentityError::LastAdmin);
        }

        if let Some(set) = self.roles.get_mut(&subject) {
            set.remove(&role);
            if set.is_empty() {
                self.roles.remove(&subject);
            }
        }
        log::info!("{} revoked from {:?} by {:?}", role, subject, ctx.caller);
        Ok(true)
    }

    // ========== Proof Verification ==========

    /// Checks that `signature` was produced by `subject` over the proof
    /// digest of `(subject, fingerprint)`.
    ///
    /// A valid signature always counts as an attempt and a success, and
    /// clears the caller's failure count for `subject`. A well-formed invalid
    /// one counts as an attempt only and returns `Ok(false)`, until the
    /// caller has submitted `max_attempts` invalid proofs in a row for
    /// `subject`; after that further invalid proofs from the same caller are
    /// rejected with `AttemptsExceeded`. Malformed signature bytes and
    /// rejected proofs leave every counter untouched.
    pub fn verify_zkp(
        &mut self,
        ctx: &CallContext,
        subject: Address,
        fingerprint: H256,
        signature: &[u8],
        max_attempts: u32,
    ) -> Result<bool> {
        self.authorize(ctx, Role::Verifier)?;

        let signature = parse_signature(signature).map_err(IdentityError::MalformedSignature)?;
        let digest = proof_digest(subject, fingerprint);
        log::debug!("checking proof digest {:?} for {:?}", digest, subject);
        let success = is_signed_by(&signature, digest, subject);

        let key = (ctx.caller, subject);
        let failed = self.failed_attempts(ctx.caller, subject);
        if !success && failed >= max_attempts {
            log::warn!(
                "invalid proof for {:?} from {:?} rejected after {} failed attempts",
                subject,
                ctx.caller,
                failed
            );
            return Err(IdentityError::AttemptsExceeded {
                subject,
                limit: max_attempts,
            });
        }

        self.profiles
            .entry(ctx.caller)
            .or_insert_with(|| VerifierProfile::new(String::new(), String::new(), ctx.timestamp))
            .record(success);
        if success {
            self.failed_attempts.remove(&key);
        } else {
            *self.failed_attempts.entry(key).or_insert(0) += 1;
        }

        log::info!(
            "proof for {:?} checked by {:?}: {}",
            subject,
            ctx.caller,
            if success { "valid" } else { "invalid" }
        );
        Ok(success)
    }

    // ========== Circuit Breaker ==========

    /// Stops every mutating operation until [`unpause`](Self::unpause).
    pub fn pause(&mut self, ctx: &CallContext) -> Result<()> {
        self.authorize(ctx, Role::Admin)?;
        self.paused = true;
        log::warn!("authority paused by {:?}", ctx.caller);
        Ok(())
    }

    pub fn unpause(&mut self, ctx: &CallContext) -> Result<()> {
        self.ensure_role(Role::Admin, ctx.caller)?;
        if !self.paused {
            return Err(IdentityError::NotPaused);
        }
        self.paused = false;
        log::info!("authority unpaused by {:?}", ctx.caller);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::crypto::{address_of, fingerprint, sign_proof};
    use ethers_core::types::H160;
    use k256::ecdsa::SigningKey;
    use rand::thread_rng;

    const ADMIN: Address = H160([0x01; 20]);
    const VERIFIER: Address = H160([0x02; 20]);
    const OUTSIDER: Address = H160([0x09; 20]);

    fn ctx(caller: Address) -> CallContext {
        CallContext::new(caller, 1_700_000_000)
    }

    fn authority_with_verifier() -> RoleAuthority {
        let mut roles = RoleAuthority::new(ADMIN);
        roles.register_verifier(&ctx(ADMIN), VERIFIER, "Test Verifier 1", "Org1").unwrap();
        roles
    }

    #[test]
    fn test_deployer_is_only_admin() {
        let roles = RoleAuthority::new(ADMIN);
        assert!(roles.has_role(Role::Admin, ADMIN));
        assert!(!roles.has_role(Role::User, ADMIN));
        assert!(!roles.has_role(Role::Verifier, ADMIN));
        assert!(!roles.has_role(Role::Admin, OUTSIDER));
        assert_eq!(roles.admin_count(), 1);
    }

    #[test]
    fn test_reregistering_keeps_counters() {
        let mut roles = authority_with_verifier();
        roles.verify_zkp(&ctx(VERIFIER), OUTSIDER, H256::zero(), &[0u8; 65], 10).unwrap();

        roles.register_verifier(&ctx(ADMIN), VERIFIER, "Renamed", "Org2").unwrap();
        let profile = roles.verifier_profile(VERIFIER).unwrap();
        assert_eq!(profile.name, "Renamed");
        assert_eq!(profile.organization, "Org2");
        assert_eq!(profile.total_verifications, 1);
    }

    #[test]
    fn test_revoked_verifier_keeps_profile() {
        let mut roles = authority_with_verifier();
        assert!(roles.revoke_role(&ctx(ADMIN), Role::Verifier, VERIFIER).unwrap());
        assert!(!roles.has_role(Role::Verifier, VERIFIER));
        assert!(roles.verifier_profile(VERIFIER).is_some());
    }

    #[test]
    fn test_revoking_unheld_role_is_noop() {
        let mut roles = RoleAuthority::new(ADMIN);
        assert!(!roles.revoke_role(&ctx(ADMIN), Role::User, OUTSIDER).unwrap());
    }

    #[test]
    fn test_last_admin_cannot_be_revoked() {
        let mut roles = RoleAuthority::new(ADMIN);
        assert_eq!(
            roles.revoke_role(&ctx(ADMIN), Role::Admin, ADMIN),
            Err(IdentityError::LastAdmin)
        );

        roles.grant_role(&ctx(ADMIN), Role::Admin, OUTSIDER).unwrap();
        assert!(roles.revoke_role(&ctx(OUTSIDER), Role::Admin, ADMIN).unwrap());
        assert_eq!(roles.admin_count(), 1);
    }

    #[test]
    fn test_malformed_signature_leaves_counters() {
        let mut roles = authority_with_verifier();
        let res = roles.verify_zkp(&ctx(VERIFIER), OUTSIDER, H256::zero(), &[1, 2, 3], 3);
        assert!(matches!(res, Err(IdentityError::MalformedSignature(_))));
        assert_eq!(roles.verifier_stats(VERIFIER).total_verifications, 0);
    }

    #[test]
    fn test_failed_attempt_limit_and_reset() {
        let mut roles = authority_with_verifier();
        let key = SigningKey::random(&mut thread_rng());
        let subject = address_of(&key);
        let fp = fingerprint(b"proof");
        let forged = sign_proof(&key, OUTSIDER, fp).unwrap().to_vec();

        assert!(!roles.verify_zkp(&ctx(VERIFIER), subject, fp, &forged, 2).unwrap());
        assert!(!roles.verify_zkp(&ctx(VERIFIER), subject, fp, &forged, 2).unwrap());
        assert_eq!(roles.failed_attempts(VERIFIER, subject), 2);
        assert_eq!(
            roles.verify_zkp(&ctx(VERIFIER), subject, fp, &forged, 2),
            Err(IdentityError::AttemptsExceeded { subject, limit: 2 })
        );
        assert_eq!(roles.verifier_stats(VERIFIER).total_verifications, 2);

        // A valid proof still goes through at the limit and clears the count.
        let valid = sign_proof(&key, subject, fp).unwrap().to_vec();
        assert!(roles.verify_zkp(&ctx(VERIFIER), subject, fp, &valid, 2).unwrap());
        assert_eq!(roles.failed_attempts(VERIFIER, subject), 0);
        assert_eq!(roles.verifier_stats(VERIFIER).total_verifications, 3);
        assert!(!roles.verify_zkp(&ctx(VERIFIER), subject, fp, &forged, 2).unwrap());
    }

    #[test]
    fn test_failures_do_not_carry_across_verifiers() {
        let mut roles = authority_with_verifier();
        roles.register_verifier(&ctx(ADMIN), OUTSIDER, "Rogue", "Org9").unwrap();
        let key = SigningKey::random(&mut thread_rng());
        let subject = address_of(&key);
        let fp = fingerprint(b"proof");
        let forged = sign_proof(&SigningKey::random(&mut thread_rng()), subject, fp).unwrap().to_vec();
        let valid = sign_proof(&key, subject, fp).unwrap().to_vec();

        for _ in 0..3 {
            assert!(!roles.verify_zkp(&ctx(OUTSIDER), subject, fp, &forged, 3).unwrap());
        }
        assert!(matches!(
            roles.verify_zkp(&ctx(OUTSIDER), subject, fp, &forged, 3),
            Err(IdentityError::AttemptsExceeded { .. })
        ));

        assert!(roles.verify_zkp(&ctx(VERIFIER), subject, fp, &valid, 3).unwrap());
        assert!(roles.verify_zkp(&ctx(VERIFIER), subject, fp, &valid, 3).unwrap());
        assert!(!roles.verify_zkp(&ctx(VERIFIER), subject, fp, &forged, 3).unwrap());
        assert_eq!(roles.failed_attempts(VERIFIER, subject), 1);
        assert_eq!(
            roles.verifier_stats(VERIFIER),
            VerifierStats {
                total_verifications: 3,
                success_rate: 66
            }
        );
    }

    #[test]
    fn test_unpause_requires_paused_state() {
        let mut roles = RoleAuthority::new(ADMIN);
        assert_eq!(roles.unpause(&ctx(ADMIN)), Err(IdentityError::NotPaused));
        roles.pause(&ctx(ADMIN)).unwrap();
        assert_eq!(roles.pause(&ctx(ADMIN)), Err(IdentityError::Paused));
        assert!(matches!(
            roles.unpause(&ctx(OUTSIDER)),
            Err(IdentityError::Unauthorized { role: Role::Admin, .. })
        ));
        roles.unpause(&ctx(ADMIN)).unwrap();
        assert!(!roles.is_paused());
    }
}
