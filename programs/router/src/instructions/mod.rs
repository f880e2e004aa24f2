//! Router entry points
//!
//! The router holds no state of its own. Each call receives the accounts it
//! touches, validates and quotes first, then drives the pools, which update
//! their accounting before any token moves.

pub mod liquidity;
pub mod swap;

pub use swap::SwapQuote;

use serde::{Deserialize, Serialize};
use singularity_common::{Address, AssetLedger, Result, SingularityError, B256};
use singularity_oracle::PriceOracle;
use singularity_pool::Pool;

use crate::state::{pool_code_hash, pool_for, Factory};

/// Accounts a router call reads and writes
pub struct Accounts<'a, L: AssetLedger> {
    pub factory: &'a mut Factory,
    pub oracle: &'a PriceOracle,
    pub ledger: &'a mut L,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub address: Address,
    pub factory: Address,
    /// Wrapped native token used by the ETH variants
    pub weth: Address,
}

impl Router {
    pub fn new(address: Address, factory: Address, weth: Address) -> Self {
        Self { address, factory, weth }
    }

    pub fn pool_code_hash(&self) -> B256 {
        pool_code_hash()
    }

    /// Derive a pool address without reading the registry
    pub fn pool_for(&self, factory: Address, asset: Address) -> Address {
        pool_for(factory, asset)
    }

    fn pool<'f>(&self, factory: &'f Factory, asset: Address) -> Result<&'f Pool> {
        factory.pool(asset).ok_or(SingularityError::PoolNotFound)
    }

    fn pool_mut<'f>(&self, factory: &'f mut Factory, asset: Address) -> Result<&'f mut Pool> {
        factory.pool_mut(asset).ok_or(SingularityError::PoolNotFound)
    }
}
