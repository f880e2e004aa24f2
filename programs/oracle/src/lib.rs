//! Price oracle
//!
//! Holds the last USD price (18 decimals) pushed for each asset. Prices are
//! written only by pushers the owner has whitelisted and read by pools and the
//! router. A zero, missing or stale price is never handed out.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use singularity_common::{Address, Env, Result, SingularityError, U256};

/// Oracle parameters (owner-configurable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Seconds after which a pushed price is treated as invalid (0 disables)
    pub max_price_age: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { max_price_age: 3_600 }
    }
}

/// Last pushed price and when it was pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceData {
    pub price: U256,
    pub updated_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOracle {
    address: Address,
    owner: Address,
    config: OracleConfig,
    pushers: BTreeSet<Address>,
    prices: BTreeMap<Address, PriceData>,
}

impl PriceOracle {
    pub fn new(address: Address, owner: Address) -> Self {
        Self::with_config(address, owner, OracleConfig::default())
    }

    pub fn with_config(address: Address, owner: Address, config: OracleConfig) -> Self {
        Self {
            address,
            owner,
            config,
            pushers: BTreeSet::new(),
            prices: BTreeMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn is_pusher(&self, account: Address) -> bool {
        self.pushers.contains(&account)
    }

    fn ensure_owner(&self, env: &Env) -> Result<()> {
        if env.sender != self.owner {
            log::warn!("Error: {} is not the oracle owner", env.sender);
            return Err(SingularityError::NotOwner);
        }
        Ok(())
    }

    /// Grant or revoke push rights (owner only)
    pub fn set_pusher(&mut self, env: &Env, pusher: Address, allowed: bool) -> Result<()> {
        self.ensure_owner(env)?;
        if allowed {
            self.pushers.insert(pusher);
        } else {
            self.pushers.remove(&pusher);
        }
        log::info!("Oracle pusher {} set to {}", pusher, allowed);
        Ok(())
    }

    /// Set the staleness threshold (owner only)
    pub fn set_max_price_age(&mut self, env: &Env, max_price_age: u64) -> Result<()> {
        self.ensure_owner(env)?;
        self.config.max_price_age = max_price_age;
        log::info!("Oracle max price age set to {}s", max_price_age);
        Ok(())
    }

    /// Overwrite the last price of each asset, stamped with the transaction time
    ///
    /// # Security Checks
    /// - Caller must be a whitelisted pusher
    /// - `assets` and `prices` must have equal length
    pub fn push_prices(&mut self, env: &Env, assets: &[Address], prices: &[U256]) -> Result<()> {
        if !self.is_pusher(env.sender) {
            log::warn!("Error: {} is not a price pusher", env.sender);
            return Err(SingularityError::NotPusher);
        }
        if assets.len() != prices.len() {
            return Err(SingularityError::NotSameLength);
        }

        for (asset, price) in assets.iter().zip(prices) {
            self.prices.insert(*asset, PriceData { price: *price, updated_at: env.timestamp });
            log::debug!("Price pushed: {} = {}", asset, price);
        }
        Ok(())
    }

    /// Raw last push, valid or not
    pub fn latest(&self, asset: Address) -> Option<PriceData> {
        self.prices.get(&asset).copied()
    }

    /// Last pushed price, rejected when missing, zero or stale at `now`
    pub fn get_price(&self, asset: Address, now: u64) -> Result<PriceData> {
        let data = self.latest(asset).ok_or(SingularityError::InvalidPrice)?;
        if data.price.is_zero() {
            return Err(SingularityError::InvalidPrice);
        }
        if self.config.max_price_age > 0
            && now.saturating_sub(data.updated_at) > self.config.max_price_age
        {
            log::debug!("Error: price for {} is stale (updated at {})", asset, data.updated_at);
            return Err(SingularityError::InvalidPrice);
        }
        Ok(data)
    }
}
