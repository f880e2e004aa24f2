//! Pool registry and protocol administration
//!
//! The factory creates one pool per asset at a deterministic address, owns
//! every pool's state, and holds the admin-controlled parameters: deposit
//! caps, base fees, the global pause switch, the fee beneficiary and the
//! coverage floor applied to swap-outs.

use std::collections::BTreeMap;

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};
use singularity_common::math::WAD;
use singularity_common::{Address, AssetLedger, Env, Result, SingularityError, B256, U256};
use singularity_pool::{Pool, PoolContext};

/// Init code identifying the pool implementation in CREATE2 derivations
const POOL_INIT_CODE: &[u8] = b"SingularityPool";

/// Hash of the pool init code, shared by the factory and the router
pub fn pool_code_hash() -> B256 {
    keccak256(POOL_INIT_CODE)
}

/// Deterministic pool address for `asset` under `factory`
pub fn pool_for(factory: Address, asset: Address) -> Address {
    factory.create2(keccak256(asset).0, pool_code_hash().0)
}

/// Factory parameters (admin-configurable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Minimum coverage ratio (WAD) a swap-out may leave behind
    pub coverage_floor: U256,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self { coverage_floor: WAD / U256::from(10) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factory {
    address: Address,
    tranche: String,
    admin: Address,
    oracle: Address,
    fee_to: Address,
    router: Option<Address>,
    chain_id: u64,
    paused_for_all: bool,
    config: FactoryConfig,
    pools: BTreeMap<Address, Pool>,
    all_pools: Vec<Address>,
}

impl Factory {
    pub fn new(
        address: Address,
        tranche: &str,
        admin: Address,
        oracle: Address,
        fee_to: Address,
        chain_id: u64,
    ) -> Self {
        Self {
            address,
            tranche: tranche.to_string(),
            admin,
            oracle,
            fee_to,
            router: None,
            chain_id,
            paused_for_all: false,
            config: FactoryConfig::default(),
            pools: BTreeMap::new(),
            all_pools: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn tranche(&self) -> &str {
        &self.tranche
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn oracle(&self) -> Address {
        self.oracle
    }

    pub fn fee_to(&self) -> Address {
        self.fee_to
    }

    pub fn router(&self) -> Option<Address> {
        self.router
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn paused_for_all(&self) -> bool {
        self.paused_for_all
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn pool_code_hash(&self) -> B256 {
        pool_code_hash()
    }

    /// Registered pool address for `asset`
    pub fn get_pool(&self, asset: Address) -> Option<Address> {
        self.pools.get(&asset).map(|p| p.address)
    }

    pub fn all_pools(&self, index: usize) -> Option<Address> {
        self.all_pools.get(index).copied()
    }

    pub fn all_pools_length(&self) -> usize {
        self.all_pools.len()
    }

    pub fn pool(&self, asset: Address) -> Option<&Pool> {
        self.pools.get(&asset)
    }

    pub fn pool_mut(&mut self, asset: Address) -> Option<&mut Pool> {
        self.pools.get_mut(&asset)
    }

    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    /// Parameters every pool reads on a mutating call
    pub fn pool_context(&self) -> PoolContext {
        PoolContext { router: self.router, coverage_floor: self.config.coverage_floor }
    }

    fn ensure_admin(&self, env: &Env) -> Result<()> {
        if env.sender != self.admin {
            log::warn!("Error: {} is not the factory admin", env.sender);
            return Err(SingularityError::NotAdmin);
        }
        Ok(())
    }

    /// Batch setters validate every entry before writing any
    fn ensure_registered(&self, assets: &[Address]) -> Result<()> {
        match assets.iter().find(|a| !self.pools.contains_key(*a)) {
            Some(asset) => {
                log::warn!("Error: no pool for {}", asset);
                Err(SingularityError::PoolNotFound)
            }
            None => Ok(()),
        }
    }

    fn known_pool_mut(&mut self, asset: Address) -> Result<&mut Pool> {
        self.pools.get_mut(&asset).ok_or(SingularityError::PoolNotFound)
    }

    /// Create and register the pool for `asset`
    ///
    /// # Security Checks
    /// - Caller must be the admin
    /// - `asset` must be non-zero, unregistered and known to the ledger
    /// - `base_fee` must be non-zero
    ///
    /// # Returns
    /// * Address of the new pool
    pub fn create_pool<L: AssetLedger>(
        &mut self,
        env: &Env,
        ledger: &L,
        asset: Address,
        is_stablecoin: bool,
        base_fee: U256,
    ) -> Result<Address> {
        self.ensure_admin(env)?;
        if asset.is_zero() {
            return Err(SingularityError::ZeroAddress);
        }
        if self.pools.contains_key(&asset) {
            return Err(SingularityError::PoolExists);
        }
        if base_fee.is_zero() {
            return Err(SingularityError::BaseFeeIsZero);
        }
        let metadata = ledger.metadata(asset).ok_or(SingularityError::UnknownAsset)?;

        let address = pool_for(self.address, asset);
        let mut pool = Pool::new(
            address,
            self.address,
            asset,
            &metadata,
            &self.tranche,
            is_stablecoin,
            base_fee,
            self.chain_id,
        );
        pool.paused = self.paused_for_all;

        self.pools.insert(asset, pool);
        self.all_pools.push(address);
        log::info!("Pool created for {} ({}) at {}", metadata.symbol, asset, address);
        Ok(address)
    }

    /// Set the router every pool trusts
    ///
    /// The first router wins. Setting the same address again is a no-op.
    pub fn set_router(&mut self, env: &Env, router: Address) -> Result<()> {
        self.ensure_admin(env)?;
        if router.is_zero() {
            return Err(SingularityError::ZeroAddress);
        }
        match self.router {
            Some(current) if current == router => Ok(()),
            Some(_) => Err(SingularityError::RouterAlreadySet),
            None => {
                self.router = Some(router);
                log::info!("Router set to {}", router);
                Ok(())
            }
        }
    }

    pub fn set_deposit_caps(&mut self, env: &Env, assets: &[Address], caps: &[U256]) -> Result<()> {
        self.ensure_admin(env)?;
        if assets.len() != caps.len() {
            return Err(SingularityError::NotSameLength);
        }
        self.ensure_registered(assets)?;
        for (asset, cap) in assets.iter().zip(caps) {
            self.known_pool_mut(*asset)?.deposit_cap = *cap;
            log::info!("Deposit cap for {} set to {}", asset, cap);
        }
        Ok(())
    }

    pub fn set_base_fees(&mut self, env: &Env, assets: &[Address], fees: &[U256]) -> Result<()> {
        self.ensure_admin(env)?;
        if assets.len() != fees.len() {
            return Err(SingularityError::NotSameLength);
        }
        if fees.iter().any(U256::is_zero) {
            return Err(SingularityError::BaseFeeIsZero);
        }
        self.ensure_registered(assets)?;
        for (asset, fee) in assets.iter().zip(fees) {
            self.known_pool_mut(*asset)?.base_fee = *fee;
            log::info!("Base fee for {} set to {}", asset, fee);
        }
        Ok(())
    }

    /// Global pause switch, applied to every current and future pool
    pub fn set_paused_for_all(&mut self, env: &Env, paused: bool) -> Result<()> {
        self.ensure_admin(env)?;
        self.paused_for_all = paused;
        for pool in self.pools.values_mut() {
            pool.paused = paused;
        }
        log::info!("Paused for all: {}", paused);
        Ok(())
    }

    /// Sweep every pool's admin fees to the fee beneficiary
    ///
    /// Locked fees stay in the pools.
    ///
    /// # Returns
    /// * `(asset, amount)` swept from each pool, in registry order
    pub fn collect_fees<L: AssetLedger>(&mut self, env: &Env, ledger: &mut L) -> Result<Vec<(Address, U256)>> {
        self.ensure_admin(env)?;
        let fee_to = self.fee_to;
        let mut swept = Vec::with_capacity(self.pools.len());

        for (asset, pool) in self.pools.iter_mut() {
            let amount = pool.admin_fees;
            pool.admin_fees = U256::ZERO;
            pool.assets -= amount;
            if !amount.is_zero() {
                ledger.transfer(*asset, pool.address, fee_to, amount)?;
                log::info!("Collected {} of {} to {}", amount, asset, fee_to);
            }
            swept.push((*asset, amount));
        }
        Ok(swept)
    }

    pub fn set_admin(&mut self, env: &Env, admin: Address) -> Result<()> {
        self.ensure_admin(env)?;
        if admin.is_zero() {
            return Err(SingularityError::ZeroAddress);
        }
        self.admin = admin;
        log::info!("Admin set to {}", admin);
        Ok(())
    }

    pub fn set_oracle(&mut self, env: &Env, oracle: Address) -> Result<()> {
        self.ensure_admin(env)?;
        if oracle.is_zero() {
            return Err(SingularityError::ZeroAddress);
        }
        self.oracle = oracle;
        log::info!("Oracle set to {}", oracle);
        Ok(())
    }

    pub fn set_fee_to(&mut self, env: &Env, fee_to: Address) -> Result<()> {
        self.ensure_admin(env)?;
        if fee_to.is_zero() {
            return Err(SingularityError::ZeroAddress);
        }
        self.fee_to = fee_to;
        log::info!("Fee beneficiary set to {}", fee_to);
        Ok(())
    }

    pub fn set_coverage_floor(&mut self, env: &Env, coverage_floor: U256) -> Result<()> {
        self.ensure_admin(env)?;
        self.config.coverage_floor = coverage_floor;
        log::info!("Coverage floor set to {}", coverage_floor);
        Ok(())
    }
}
