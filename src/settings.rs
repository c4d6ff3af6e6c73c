// src/settings.rs
//! Runtime settings.
//!
//! Layering, lowest to highest priority:
//! 1. built-in defaults
//! 2. a TOML/YAML/JSON file (`identity.*` in the working directory, or an
//!    explicit path)
//! 3. environment variables prefixed `IDENTITY__`, nested with `__`,
//!    e.g. `IDENTITY__SYSTEM__MAX_VERIFICATION_ATTEMPTS=5`
//!
//! A `.env` file is loaded into the environment first when present.

use crate::models::config::{
    SystemConfig, DEFAULT_DOCUMENT_EXPIRY, DEFAULT_MAX_VERIFICATION_ATTEMPTS, DEFAULT_VERIFICATION_FEE_WEI,
};
use crate::storage::ipfs_client::{IpfsStorage, DEFAULT_IPFS_API_URL};
use anyhow::Context;
use config::{Config, Environment, File};
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub system: SystemSettings,
    pub ipfs: IpfsSettings,
}

/// Initial values of the system configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    /// Decimal wei amount; kept as a string so it can exceed 64 bits.
    pub verification_fee_wei: String,
    pub document_expiry_time: u64,
    pub max_verification_attempts: u32,
    pub allow_multiple_dids: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpfsSettings {
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: "info".to_string(),
            system: SystemSettings::default(),
            ipfs: IpfsSettings::default(),
        }
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        SystemSettings {
            verification_fee_wei: DEFAULT_VERIFICATION_FEE_WEI.to_string(),
            document_expiry_time: DEFAULT_DOCUMENT_EXPIRY,
            max_verification_attempts: DEFAULT_MAX_VERIFICATION_ATTEMPTS,
            allow_multiple_dids: false,
        }
    }
}

impl Default for IpfsSettings {
    fn default() -> Self {
        IpfsSettings {
            api_url: DEFAULT_IPFS_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env`, then an optional `identity.*` file, then the environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::build(File::with_name("identity").required(false))
    }

    /// Loads settings from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::build(File::from(path).required(true))
            .with_context(|| format!("loading settings from {}", path.display()))
    }

    fn build<S>(file: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("IDENTITY").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Converts the `system` section into a validated [`SystemConfig`].
    pub fn system_config(&self) -> anyhow::Result<SystemConfig> {
        let fee = U256::from_dec_str(self.system.verification_fee_wei.trim())
            .map_err(|e| anyhow::anyhow!("verification_fee_wei {:?}: {:?}", self.system.verification_fee_wei, e))?;
        let config = SystemConfig {
            verification_fee: fee,
            document_expiry_time: self.system.document_expiry_time,
            max_verification_attempts: self.system.max_verification_attempts,
            allow_multiple_dids: self.system.allow_multiple_dids,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn ipfs_storage(&self) -> anyhow::Result<IpfsStorage> {
        Ok(IpfsStorage::with_api_url(&self.ipfs.api_url)?)
    }
}
