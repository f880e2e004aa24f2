//! Add and remove liquidity, with native and permit variants

use singularity_common::{Address, AssetLedger, Env, Result, SingularityError, B256, U256};

use super::{Accounts, Router};

/// Signed allowance attached to a `*_with_permit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitSignature {
    /// Sign for `U256::MAX` instead of the exact share amount
    pub approve_max: bool,
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl Router {
    /// Deposit `amount` of `token` on behalf of the caller
    ///
    /// # Security Checks
    /// - `deadline` must not be in the past
    /// - Minted shares must be at least `min_shares`
    ///
    /// # Returns
    /// * Shares minted to `to`
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token: Address,
        amount: U256,
        min_shares: U256,
        to: Address,
        deadline: U256,
    ) -> Result<U256> {
        env.ensure_deadline(deadline)?;
        self.check_deposit(acc, token, amount, min_shares)?;

        acc.ledger.transfer_from(token, self.address, env.sender, self.address, amount)?;
        self.deposit(acc, env, token, amount, to)
    }

    /// Deposit the native value attached to the call as wrapped native
    pub fn add_liquidity_eth<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        min_shares: U256,
        to: Address,
        deadline: U256,
    ) -> Result<U256> {
        env.ensure_deadline(deadline)?;
        let amount = env.value;
        self.check_deposit(acc, self.weth, amount, min_shares)?;

        acc.ledger.transfer_native(env.sender, self.address, amount)?;
        acc.ledger.wrap_native(self.weth, self.address, amount)?;
        self.deposit(acc, env, self.weth, amount, to)
    }

    fn check_deposit<L: AssetLedger>(
        &self,
        acc: &Accounts<'_, L>,
        token: Address,
        amount: U256,
        min_shares: U256,
    ) -> Result<()> {
        let shares = self.pool(acc.factory, token)?.preview_deposit(amount)?;
        if shares < min_shares {
            return Err(SingularityError::InsufficientLiquidityAmount);
        }
        Ok(())
    }

    /// Hand tokens already held by the router to the pool
    fn deposit<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token: Address,
        amount: U256,
        to: Address,
    ) -> Result<U256> {
        let ctx = acc.factory.pool_context();
        let pool = self.pool_mut(acc.factory, token)?;
        acc.ledger.approve(token, self.address, pool.address, amount)?;
        pool.deposit(&ctx, &env.as_caller(self.address), acc.ledger, amount, to)
    }

    /// Redeem `shares` of the caller for `token`
    ///
    /// # Security Checks
    /// - `deadline` must not be in the past
    /// - Redeemed amount must be at least `min_amount`
    /// - The caller must have approved the router for `shares`
    ///
    /// # Returns
    /// * Underlying paid to `to`
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token: Address,
        shares: U256,
        min_amount: U256,
        to: Address,
        deadline: U256,
    ) -> Result<U256> {
        env.ensure_deadline(deadline)?;
        self.withdraw(acc, env, token, shares, min_amount, to)
    }

    /// Redeem shares of the wrapped-native pool and pay out native value
    pub fn remove_liquidity_eth<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        shares: U256,
        min_amount: U256,
        to: Address,
        deadline: U256,
    ) -> Result<U256> {
        env.ensure_deadline(deadline)?;
        let amount = self.withdraw(acc, env, self.weth, shares, min_amount, self.address)?;
        acc.ledger.unwrap_native(self.weth, self.address, amount)?;
        acc.ledger.transfer_native(self.address, to, amount)?;
        Ok(amount)
    }

    /// [`Router::remove_liquidity`] authorised by a signed permit
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_with_permit<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token: Address,
        shares: U256,
        min_amount: U256,
        to: Address,
        deadline: U256,
        permit: PermitSignature,
    ) -> Result<U256> {
        self.apply_permit(acc, env, token, shares, deadline, permit)?;
        self.remove_liquidity(acc, env, token, shares, min_amount, to, deadline)
    }

    /// [`Router::remove_liquidity_eth`] authorised by a signed permit
    #[allow(clippy::too_many_arguments)]
    pub fn remove_liquidity_eth_with_permit<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        shares: U256,
        min_amount: U256,
        to: Address,
        deadline: U256,
        permit: PermitSignature,
    ) -> Result<U256> {
        self.apply_permit(acc, env, self.weth, shares, deadline, permit)?;
        self.remove_liquidity_eth(acc, env, shares, min_amount, to, deadline)
    }

    fn apply_permit<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token: Address,
        shares: U256,
        deadline: U256,
        permit: PermitSignature,
    ) -> Result<()> {
        let value = if permit.approve_max { U256::MAX } else { shares };
        self.pool_mut(acc.factory, token)?.permit(
            env,
            env.sender,
            self.address,
            value,
            deadline,
            permit.v,
            permit.r,
            permit.s,
        )
    }

    fn withdraw<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token: Address,
        shares: U256,
        min_amount: U256,
        to: Address,
    ) -> Result<U256> {
        let amount = self.pool(acc.factory, token)?.preview_withdraw(shares)?;
        if amount < min_amount {
            return Err(SingularityError::InsufficientTokenAmount);
        }

        let ctx = acc.factory.pool_context();
        let router_env = env.as_caller(self.address);
        let pool = self.pool_mut(acc.factory, token)?;
        pool.transfer_from(&router_env, env.sender, self.address, shares)?;
        pool.withdraw(&ctx, &router_env, acc.ledger, shares, to)
    }
}
