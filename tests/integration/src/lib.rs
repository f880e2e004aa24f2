//! Shared fixtures for the scenario tests
//!
//! [`World`] is a deployment with a USDC pool and a WETH pool, caps lifted
//! and prices pushed. Every helper runs through [`Deployment::transact`], so a
//! failing call leaves the world exactly as it was.

use singularity_common::math::{pow10, WAD};
use singularity_common::{Address, AssetLedger, Env, Result, SingularityError, U256};
use singularity_pool::Pool;
use singularity_router::{Deployment, SwapQuote, DEFAULT_TRANCHE};

/// Transaction time used by every fixture call
pub const NOW: u64 = 1_000;
pub const CHAIN_ID: u64 = 31337;

pub fn admin() -> Address {
    Address::repeat_byte(0xad)
}

pub fn lp() -> Address {
    Address::repeat_byte(0x11)
}

pub fn trader() -> Address {
    Address::repeat_byte(0x22)
}

/// `n` whole tokens with `decimals`
pub fn units(n: u64, decimals: u8) -> U256 {
    U256::from(n) * pow10(decimals)
}

pub fn usdc(n: u64) -> U256 {
    units(n, 6)
}

pub fn eth(n: u64) -> U256 {
    units(n, 18)
}

/// Fee rate in WAD from basis points
pub fn bps(n: u64) -> U256 {
    U256::from(n) * WAD / U256::from(10_000u64)
}

pub fn env(sender: Address) -> Env {
    Env::new(sender, NOW)
}

pub struct World {
    pub d: Deployment,
    pub usdc: Address,
    pub weth: Address,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// USDC and WETH pools at 15 bps, uncapped, USDC = $1 and ETH = $2000
    pub fn new() -> Self {
        let mut d = Deployment::new(admin(), DEFAULT_TRANCHE, CHAIN_ID)
            .expect("deployment");
        let admin_env = env(admin());
        let usdc = d.bank.deploy_token("USD Coin", "USDC", 6);
        let weth = d.router.weth;

        d.factory.create_pool(&admin_env, &d.bank, usdc, true, bps(15)).expect("usdc pool");
        d.factory.create_pool(&admin_env, &d.bank, weth, false, bps(15)).expect("weth pool");
        d.factory
            .set_deposit_caps(&admin_env, &[usdc, weth], &[U256::MAX, U256::MAX])
            .expect("caps");
        d.oracle
            .push_prices(&admin_env, &[usdc, weth], &[WAD, U256::from(2_000u64) * WAD])
            .expect("prices");

        Self { d, usdc, weth }
    }

    pub fn pool(&self, token: Address) -> &Pool {
        self.d.factory.pool(token).expect("pool exists")
    }

    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.d.bank.balance_of(token, owner)
    }

    /// Give `who` tokens and approve the router for all of them
    pub fn fund(&mut self, who: Address, token: Address, amount: U256) {
        let router = self.d.router.address;
        if token == self.weth {
            self.d.bank.fund(who, amount).expect("fund");
            self.d.bank.wrap_native(token, who, amount).expect("wrap");
        } else {
            self.d.bank.mint(token, who, amount).expect("mint");
        }
        self.d.bank.approve(token, who, router, U256::MAX).expect("approve");
    }

    /// Fund the LP and deposit both sides
    pub fn seed(&mut self, usdc_amount: U256, eth_amount: U256) {
        let (usdc, weth) = (self.usdc, self.weth);
        self.fund(lp(), usdc, usdc_amount);
        self.fund(lp(), weth, eth_amount);
        self.add(lp(), usdc, usdc_amount).expect("seed usdc");
        self.add(lp(), weth, eth_amount).expect("seed weth");
    }

    pub fn add(&mut self, who: Address, token: Address, amount: U256) -> Result<U256> {
        let env = env(who);
        self.d.transact(|d| {
            let router = d.router;
            router.add_liquidity(&mut d.accounts(), &env, token, amount, U256::ZERO, who, U256::MAX)
        })
    }

    /// Approve the router for `shares` and redeem them
    pub fn remove(&mut self, who: Address, token: Address, shares: U256) -> Result<U256> {
        let env = env(who);
        self.d.transact(|d| {
            let router = d.router;
            d.factory
                .pool_mut(token)
                .ok_or(SingularityError::PoolNotFound)?
                .approve(&env, router.address, shares)?;
            router.remove_liquidity(&mut d.accounts(), &env, token, shares, U256::ZERO, who, U256::MAX)
        })
    }

    pub fn swap(
        &mut self,
        who: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<SwapQuote> {
        let env = env(who);
        self.d.transact(|d| {
            let router = d.router;
            router.swap_exact_tokens_for_tokens(
                &mut d.accounts(),
                &env,
                token_in,
                token_out,
                amount_in,
                U256::ZERO,
                who,
                U256::MAX,
            )
        })
    }

    /// Reserved fees fit in assets and every pool holds exactly its assets
    pub fn assert_solvent(&self) {
        for pool in self.d.factory.pools() {
            assert!(
                pool.admin_fees + pool.locked_fees <= pool.assets,
                "fees exceed assets on {}",
                pool.address
            );
            assert_eq!(
                self.balance(pool.token, pool.address),
                pool.assets,
                "ledger balance differs from assets on {}",
                pool.address
            );
        }
    }
}
