// src/models/config.rs
//! System-wide configuration record.

use crate::error::{IdentityError, Result};
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

/// One day in seconds.
pub const DAY: u64 = 24 * 60 * 60;

/// Default verification fee: 0.1 ether in wei.
pub const DEFAULT_VERIFICATION_FEE_WEI: u64 = 100_000_000_000_000_000;

/// Default validity window for uploaded documents.
pub const DEFAULT_DOCUMENT_EXPIRY: u64 = 365 * DAY;

pub const DEFAULT_MAX_VERIFICATION_ATTEMPTS: u32 = 3;

/// Singleton configuration consulted by every component.
///
/// The four fields are the published configuration surface read by
/// billing and enforcement layers outside the authority.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    /// Flat verification fee in wei.
    pub verification_fee: U256,
    /// Maximum validity window for a document, in seconds.
    pub document_expiry_time: u64,
    /// Consecutive failed proof verifications tolerated per subject.
    pub max_verification_attempts: u32,
    /// Whether a subject may hold one DID record per document kind.
    #[serde(rename = "allowMultipleDIDs")]
    pub allow_multiple_dids: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            verification_fee: U256::from(DEFAULT_VERIFICATION_FEE_WEI),
            document_expiry_time: DEFAULT_DOCUMENT_EXPIRY,
            max_verification_attempts: DEFAULT_MAX_VERIFICATION_ATTEMPTS,
            allow_multiple_dids: false,
        }
    }
}

impl SystemConfig {
    /// Checks value ranges. The fee is unsigned, so only the duration and
    /// attempt limit can be out of range.
    pub fn validate(&self) -> Result<()> {
        if self.document_expiry_time == 0 {
            return Err(IdentityError::InvalidConfig(
                "documentExpiryTime must be greater than zero".into(),
            ));
        }
        if self.max_verification_attempts == 0 {
            return Err(IdentityError::InvalidConfig(
                "maxVerificationAttempts must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
