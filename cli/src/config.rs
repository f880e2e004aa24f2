//! CLI configuration and signing key management

use anyhow::{Context, Result};
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use singularity_common::eip712::{signer_address, signing_key_from_hex};
use singularity_common::Address;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config location
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/singularity/config.toml";

/// Well-known local development account #0
pub const DEV_ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON snapshot of the deployment
    pub state_path: String,
    pub chain_id: u64,
    /// Pool tranche label used by `init`
    pub tranche: String,
    /// Default caller (falls back to the private key's address)
    pub sender: Option<Address>,
    /// Hex secp256k1 key used to sign permits
    pub private_key: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_path: "~/.config/singularity/deployment.json".to_string(),
            chain_id: 31337,
            tranche: singularity_router::DEFAULT_TRANCHE.to_string(),
            sender: None,
            private_key: None,
        }
    }
}

impl CliConfig {
    /// Load from `path`, or the default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => expand(DEFAULT_CONFIG_PATH),
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn state_path(&self) -> PathBuf {
        expand(&self.state_path)
    }

    pub fn signing_key(&self) -> Result<Option<SigningKey>> {
        match &self.private_key {
            Some(hex) => signing_key_from_hex(hex)
                .map(Some)
                .context("Invalid private_key in config"),
            None => Ok(None),
        }
    }

    /// Caller used when `--sender` is not given
    pub fn default_sender(&self) -> Result<Address> {
        if let Some(sender) = self.sender {
            return Ok(sender);
        }
        if let Some(key) = self.signing_key()? {
            return Ok(signer_address(&key));
        }
        DEV_ACCOUNT.parse().context("Invalid development account")
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
