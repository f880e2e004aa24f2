//! Deposit and withdraw
//!
//! Both operations settle against liabilities at price-per-share. Accounting
//! is updated before any token moves.

use singularity_common::{Address, AssetLedger, Env, Result, SingularityError, U256};

use crate::math::{amount_for_shares, shares_for_deposit};
use crate::state::{Pool, PoolContext};

impl Pool {
    /// Shares minted for depositing `amount` right now
    ///
    /// # Returns
    /// * `Paused`, `AmountIsZero` or `DepositExceedsCap`, checked in that order
    pub fn preview_deposit(&self, amount: U256) -> Result<U256> {
        self.ensure_not_paused()?;
        if amount.is_zero() {
            return Err(SingularityError::AmountIsZero);
        }
        let within_cap = self.assets.checked_add(amount).is_some_and(|total| total <= self.deposit_cap);
        if !within_cap {
            log::debug!(
                "Error: deposit of {} exceeds cap {} on {}",
                amount,
                self.deposit_cap,
                self.address
            );
            return Err(SingularityError::DepositExceedsCap);
        }
        Ok(shares_for_deposit(amount, self.liabilities, self.claim.total_supply)?)
    }

    /// Pull `amount` of underlying from the router and mint shares to `to`
    ///
    /// # Arguments
    /// * `ctx` - Router identity and coverage floor from the factory
    /// * `env` - Caller must be the router
    /// * `ledger` - Underlying token ledger
    /// * `amount` - Underlying units deposited
    /// * `to` - Share recipient
    ///
    /// # Returns
    /// * Shares minted
    pub fn deposit<L: AssetLedger>(
        &mut self,
        ctx: &PoolContext,
        env: &Env,
        ledger: &mut L,
        amount: U256,
        to: Address,
    ) -> Result<U256> {
        self.ensure_router(ctx, env)?;
        let shares = self.preview_deposit(amount)?;

        self.assets += amount;
        self.liabilities += amount;
        self.claim.mint(to, shares)?;

        ledger.transfer_from(self.token, self.address, env.sender, self.address, amount)?;

        log::debug!("Deposit: {} into {}, {} shares to {}", amount, self.address, shares, to);
        Ok(shares)
    }

    /// Underlying redeemed by burning `shares` right now
    pub fn preview_withdraw(&self, shares: U256) -> Result<U256> {
        self.ensure_not_paused()?;
        if shares.is_zero() {
            return Err(SingularityError::AmountIsZero);
        }
        let amount = amount_for_shares(shares, self.liabilities, self.claim.total_supply)?;
        if amount > self.free_assets() {
            log::debug!(
                "Error: withdrawal of {} exceeds free assets {} on {}",
                amount,
                self.free_assets(),
                self.address
            );
            return Err(SingularityError::InsufficientLiquidity);
        }
        Ok(amount)
    }

    /// Burn `shares` held by the router and pay the underlying to `to`
    ///
    /// # Returns
    /// * Underlying units paid
    pub fn withdraw<L: AssetLedger>(
        &mut self,
        ctx: &PoolContext,
        env: &Env,
        ledger: &mut L,
        shares: U256,
        to: Address,
    ) -> Result<U256> {
        self.ensure_router(ctx, env)?;
        let amount = self.preview_withdraw(shares)?;

        self.claim.burn(env.sender, shares)?;
        self.assets -= amount;
        self.liabilities -= amount;

        self.pay(ledger, to, amount)?;

        log::debug!("Withdraw: {} shares from {}, {} paid to {}", shares, self.address, amount, to);
        Ok(amount)
    }
}
