//! A complete deployment and its transaction boundary
//!
//! Oracle, factory and router sit at the admin's first three CREATE
//! addresses. The token bank backs every asset, including the wrapped native
//! token the router is bound to.

use serde::{Deserialize, Serialize};
use singularity_common::{Address, Env, Result, TokenBank};
use singularity_oracle::PriceOracle;

use crate::instructions::{Accounts, Router};
use crate::state::Factory;

pub const DEFAULT_TRANCHE: &str = "Tranche A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub admin: Address,
    pub oracle: PriceOracle,
    pub factory: Factory,
    pub router: Router,
    pub bank: TokenBank,
}

impl Deployment {
    /// Deploy oracle, factory and router owned by `admin`
    ///
    /// The admin is the first price pusher and the fee beneficiary. The
    /// router is registered on the factory straight away.
    pub fn new(admin: Address, tranche: &str, chain_id: u64) -> Result<Self> {
        let mut bank = TokenBank::new();
        let weth = bank.deploy_wrapped_native("Wrapped Ether", "WETH");

        let env = Env::new(admin, 0);
        let mut oracle = PriceOracle::new(admin.create(0), admin);
        oracle.set_pusher(&env, admin, true)?;

        let mut factory = Factory::new(admin.create(1), tranche, admin, oracle.address(), admin, chain_id);
        let router = Router::new(admin.create(2), factory.address(), weth);
        factory.set_router(&env, router.address)?;

        log::info!(
            "Deployed oracle {}, factory {}, router {} on chain {}",
            oracle.address(),
            factory.address(),
            router.address,
            chain_id
        );
        Ok(Self { admin, oracle, factory, router, bank })
    }

    /// Accounts handed to router calls
    pub fn accounts(&mut self) -> Accounts<'_, TokenBank> {
        Accounts { factory: &mut self.factory, oracle: &self.oracle, ledger: &mut self.bank }
    }

    /// Run `op` as one transaction: on error every change is rolled back
    pub fn transact<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::debug!("Transaction reverted: {}", err);
                *self = snapshot;
                Err(err)
            }
        }
    }
}
