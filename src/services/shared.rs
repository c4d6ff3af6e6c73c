// src/services/shared.rs
//! Thread-safe handle to one authority instance.
//!
//! All calls go through a single mutex, so operations are applied one at a
//! time in lock order and never interleave. The handle stamps each call
//! with the clock's current time; callers only say who is calling.

use crate::contracts::CallContext;
use crate::error::Result;
use crate::models::config::SystemConfig;
use crate::models::did::DidView;
use crate::models::document::DocumentInfo;
use crate::models::role::Role;
use crate::models::verifier::VerifierStats;
use crate::services::authority::IdentityAuthority;
use crate::utils::time::{Clock, SystemClock};
use ethers_core::types::{Address, H256};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct SharedAuthority {
    inner: Arc<Mutex<IdentityAuthority>>,
    clock: Arc<dyn Clock>,
}

impl SharedAuthority {
    pub fn new(authority: IdentityAuthority) -> Self {
        Self::with_clock(authority, Arc::new(SystemClock))
    }

    pub fn with_clock(authority: IdentityAuthority, clock: Arc<dyn Clock>) -> Self {
        SharedAuthority {
            inner: Arc::new(Mutex::new(authority)),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, IdentityAuthority> {
        // Operations validate before writing, so a panicking holder cannot
        // have left a half-applied change behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn context(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.clock.now())
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Runs `f` against a consistent snapshot of the state.
    pub fn read<R>(&self, f: impl FnOnce(&IdentityAuthority) -> R) -> R {
        let guard = self.lock();
        f(&*guard)
    }

    /// Runs `f` as one transaction stamped with the current time.
    pub fn transact<R>(&self, caller: Address, f: impl FnOnce(&mut IdentityAuthority, &CallContext) -> R) -> R {
        let mut guard = self.lock();
        let ctx = self.context(caller);
        f(&mut *guard, &ctx)
    }

    pub fn register_verifier(&self, caller: Address, subject: Address, name: &str, organization: &str) -> Result<()> {
        self.transact(caller, |a, ctx| a.register_verifier(ctx, subject, name, organization))
    }

    pub fn register_user(&self, caller: Address, subject: Address) -> Result<()> {
        self.transact(caller, |a, ctx| a.register_user(ctx, subject))
    }

    pub fn grant_role(&self, caller: Address, role: Role, subject: Address) -> Result<()> {
        self.transact(caller, |a, ctx| a.grant_role(ctx, role, subject))
    }

    pub fn revoke_role(&self, caller: Address, role: Role, subject: Address) -> Result<()> {
        self.transact(caller, |a, ctx| a.revoke_role(ctx, role, subject))
    }

    pub fn has_role(&self, role: Role, subject: Address) -> bool {
        self.read(|a| a.has_role(role, subject))
    }

    pub fn verify_zkp(&self, caller: Address, subject: Address, fingerprint: H256, signature: &[u8]) -> Result<bool> {
        self.transact(caller, |a, ctx| a.verify_zkp(ctx, subject, fingerprint, signature))
    }

    pub fn get_verifier_stats(&self, subject: Address) -> VerifierStats {
        self.read(|a| a.get_verifier_stats(subject))
    }

    pub fn pause(&self, caller: Address) -> Result<()> {
        self.transact(caller, |a, ctx| a.pause(ctx))
    }

    pub fn unpause(&self, caller: Address) -> Result<()> {
        self.transact(caller, |a, ctx| a.unpause(ctx))
    }

    pub fn is_paused(&self) -> bool {
        self.read(IdentityAuthority::is_paused)
    }

    pub fn update_system_config(&self, caller: Address, config: SystemConfig) -> Result<()> {
        self.transact(caller, |a, ctx| a.update_system_config(ctx, config))
    }

    pub fn config(&self) -> SystemConfig {
        self.read(|a| a.config().clone())
    }

    pub fn upload_document(&self, caller: Address, handle: &str, kind: &str, expiry: u64) -> Result<u64> {
        self.transact(caller, |a, ctx| a.upload_document(ctx, handle, kind, expiry))
    }

    pub fn get_document(&self, handle: &str) -> Result<DocumentInfo> {
        self.read(|a| a.get_document(handle))
    }

    pub fn verify_document(&self, caller: Address, handle: &str) -> Result<()> {
        self.transact(caller, |a, ctx| a.verify_document(ctx, handle))
    }

    pub fn deactivate_document(&self, caller: Address, handle: &str) -> Result<()> {
        self.transact(caller, |a, ctx| a.deactivate_document(ctx, handle))
    }

    pub fn get_did(&self, subject: Address) -> Result<DidView> {
        self.read(|a| a.get_did(subject))
    }

    pub fn revoke_did(&self, caller: Address, subject: Address) -> Result<()> {
        self.transact(caller, |a, ctx| a.revoke_did(ctx, subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DAY;
    use crate::utils::time::ManualClock;
    use ethers_core::types::H160;
    use std::thread;

    const ADMIN: H160 = H160([0x01; 20]);
    const VERIFIER: H160 = H160([0x02; 20]);

    #[test]
    fn test_clock_stamps_operations() {
        let clock = Arc::new(ManualClock::new(1_000));
        let shared = SharedAuthority::with_clock(IdentityAuthority::with_defaults(ADMIN), clock.clone());
        shared.register_verifier(ADMIN, VERIFIER, "V", "Org1").unwrap();
        shared.register_user(VERIFIER, VERIFIER).unwrap();

        clock.advance(DAY);
        let stored = shared.upload_document(VERIFIER, "Qm1", "PAN", 1_000 + 2 * DAY).unwrap();
        assert_eq!(stored, 1_000 + 2 * DAY);
        let (_, uploaded_at, _, _, _) = shared.get_document("Qm1").unwrap();
        assert_eq!(uploaded_at, 1_000 + DAY);
    }

    #[test]
    fn test_concurrent_enrollment_is_serialized() {
        let shared = SharedAuthority::with_clock(
            IdentityAuthority::with_defaults(ADMIN),
            Arc::new(ManualClock::new(1)),
        );
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || shared.grant_role(ADMIN, Role::User, H160([0x10 + i; 20])))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(shared.read(|a| a.events().len()), 8);
        for i in 0..8u8 {
            assert!(shared.has_role(Role::User, H160([0x10 + i; 20])));
        }
    }
}
