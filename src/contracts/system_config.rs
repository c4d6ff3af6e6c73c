// src/contracts/system_config.rs
//! Admin-controlled singleton configuration.

use crate::contracts::role_authority::RoleAuthority;
use crate::contracts::CallContext;
use crate::error::Result;
use crate::models::config::SystemConfig;
use crate::models::role::Role;

#[derive(Debug, Clone)]
pub struct SystemConfigStore {
    config: SystemConfig,
}

impl SystemConfigStore {
    /// Starts from a validated initial configuration.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(SystemConfigStore { config })
    }

    /// Current configuration. Readable while paused.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Replaces the whole record. Nothing changes unless every field is
    /// in range.
    ///
    /// # Errors
    /// `Paused`, `Unauthorized` for non-admins, `InvalidConfig` for values
    /// out of range.
    pub fn update_system_config(
        &mut self,
        ctx: &CallContext,
        roles: &RoleAuthority,
        config: SystemConfig,
    ) -> Result<()> {
        roles.authorize(ctx, Role::Admin)?;
        config.validate()?;
        log::info!(
            "system config updated by {:?}: fee={} expiry={}s attempts={} multiple_dids={}",
            ctx.caller,
            config.verification_fee,
            config.document_expiry_time,
            config.max_verification_attempts,
            config.allow_multiple_dids
        );
        self.config = config;
        Ok(())
    }
}

impl Default for SystemConfigStore {
    fn default() -> Self {
        SystemConfigStore {
            config: SystemConfig::default(),
        }
    }
}
