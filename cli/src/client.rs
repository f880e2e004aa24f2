//! Persisted deployment and transaction submission

use anyhow::{anyhow, bail, Context, Result};
use singularity_common::math::parse_units;
use singularity_common::{Address, AssetLedger, Env, U256};
use singularity_router::Deployment;
use std::fs;
use std::path::PathBuf;

use crate::config::CliConfig;

pub struct Client {
    pub deployment: Deployment,
    pub sender: Address,
    /// Transaction time (unix seconds)
    pub now: u64,
    state_path: PathBuf,
}

impl Client {
    /// Open the deployment stored at the configured state path
    pub fn open(config: &CliConfig, sender: Address, now: u64) -> Result<Self> {
        let state_path = config.state_path();
        if !state_path.exists() {
            bail!(
                "No deployment found at {}\nCreate one with: singularity init",
                state_path.display()
            );
        }
        let data = fs::read_to_string(&state_path)
            .with_context(|| format!("Failed to read state file: {}", state_path.display()))?;
        let deployment: Deployment = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse state file: {}", state_path.display()))?;
        Ok(Self { deployment, sender, now, state_path })
    }

    /// Wrap a fresh deployment that has not been saved yet
    pub fn create(config: &CliConfig, deployment: Deployment, sender: Address, now: u64) -> Self {
        Self { deployment, sender, now, state_path: config.state_path() }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(&self.deployment)?;
        fs::write(&self.state_path, data)
            .with_context(|| format!("Failed to write state file: {}", self.state_path.display()))
    }

    pub fn env(&self) -> Env {
        Env::new(self.sender, self.now)
    }

    /// Run one transaction and persist the result
    ///
    /// A failed transaction leaves both the in-memory and the stored state
    /// untouched.
    pub fn execute<T>(
        &mut self,
        op: impl FnOnce(&mut Deployment, &Env) -> singularity_common::Result<T>,
    ) -> Result<T> {
        self.execute_with_value(U256::ZERO, op)
    }

    /// [`Client::execute`] with native value attached
    pub fn execute_with_value<T>(
        &mut self,
        value: U256,
        op: impl FnOnce(&mut Deployment, &Env) -> singularity_common::Result<T>,
    ) -> Result<T> {
        let env = self.env().with_value(value);
        let out = self
            .deployment
            .transact(|d| op(d, &env))
            .map_err(|e| anyhow!("Transaction reverted: {}", e))?;
        self.save()?;
        Ok(out)
    }

    /// Resolve a token by address, symbol, or `ETH` for the wrapped native token
    pub fn token(&self, name: &str) -> Result<Address> {
        if let Ok(address) = name.parse::<Address>() {
            return Ok(address);
        }
        if name.eq_ignore_ascii_case("eth") {
            return Ok(self.deployment.router.weth);
        }
        self.deployment
            .bank
            .tokens()
            .find(|(_, meta)| meta.symbol.eq_ignore_ascii_case(name))
            .map(|(address, _)| address)
            .ok_or_else(|| anyhow!("Unknown token: {}", name))
    }

    /// Resolve an account: an address, `router`, `admin` or `me`
    pub fn account(&self, name: &str) -> Result<Address> {
        match name.to_ascii_lowercase().as_str() {
            "router" => Ok(self.deployment.router.address),
            "admin" => Ok(self.deployment.factory.admin()),
            "me" => Ok(self.sender),
            _ => name.parse().with_context(|| format!("Invalid address: {}", name)),
        }
    }

    pub fn decimals(&self, token: Address) -> Result<u8> {
        self.deployment
            .bank
            .metadata(token)
            .map(|m| m.decimals)
            .ok_or_else(|| anyhow!("Unknown token: {}", token))
    }

    pub fn symbol(&self, token: Address) -> String {
        self.deployment
            .bank
            .metadata(token)
            .map(|m| m.symbol)
            .unwrap_or_else(|| token.to_string())
    }

    /// Parse a decimal amount of `token` into raw units
    pub fn amount(&self, token: Address, value: &str) -> Result<U256> {
        parse_amount(value, self.decimals(token)?)
    }
}

/// Parse a decimal amount, or `max` for the uncapped sentinel
pub fn parse_amount(value: &str, decimals: u8) -> Result<U256> {
    if value.eq_ignore_ascii_case("max") {
        return Ok(U256::MAX);
    }
    parse_units(value, decimals).ok_or_else(|| anyhow!("Invalid amount: {}", value))
}
