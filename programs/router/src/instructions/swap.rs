//! Cross-pool swaps and quotes
//!
//! A swap runs four steps, all priced up front by [`Router::quote`]:
//! 1. in-leg on the input pool (fee, possible rebate)
//! 2. USD value of the credited amount at the input asset's oracle price
//! 3. the same USD value expressed in the output asset
//! 4. out-leg on the output pool (slippage, fee)
//!
//! The execution path applies exactly the quoted legs.

use singularity_common::{Address, AssetLedger, Env, Result, SingularityError, U256};
use singularity_oracle::PriceOracle;
use singularity_pool::{SwapInQuote, SwapOutQuote};

use super::{Accounts, Router};
use crate::state::Factory;

/// Step-by-step breakdown of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub token_in: Address,
    pub token_out: Address,
    pub in_leg: SwapInQuote,
    /// USD value (18 decimals) of the in-leg's credited amount
    pub usd_value: U256,
    pub out_leg: SwapOutQuote,
}

impl SwapQuote {
    pub fn amount_in(&self) -> U256 {
        self.in_leg.amount_in
    }

    pub fn amount_out(&self) -> U256 {
        self.out_leg.amount_out
    }
}

impl Router {
    /// Price a swap of `amount_in` without touching any state
    ///
    /// # Returns
    /// * `InsufficientInputAmount` for a zero input
    /// * `IdenticalTokens`, `PoolNotFound`, `InvalidOraclePrice` or
    ///   `InsufficientLiquidity` when the swap cannot be priced
    pub fn quote(
        &self,
        factory: &Factory,
        oracle: &PriceOracle,
        now: u64,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> Result<SwapQuote> {
        if amount_in.is_zero() {
            return Err(SingularityError::InsufficientInputAmount);
        }
        if token_in == token_out {
            return Err(SingularityError::IdenticalTokens);
        }
        let pool_in = self.pool(factory, token_in)?;
        let pool_out = self.pool(factory, token_out)?;

        let in_leg = pool_in.quote_swap_in(amount_in)?;
        let usd_value = pool_in.amount_to_usd(oracle, now, in_leg.amount_post)?;
        let requested = pool_out.usd_to_amount(oracle, now, usd_value)?;
        if requested.is_zero() {
            return Err(SingularityError::InsufficientOutputAmount);
        }
        let out_leg = pool_out.quote_swap_out(requested, factory.config().coverage_floor)?;

        Ok(SwapQuote { token_in, token_out, in_leg, usd_value, out_leg })
    }

    /// Amount of `token_out` a swap of `amount_in` would pay right now
    pub fn get_amount_out(
        &self,
        factory: &Factory,
        oracle: &PriceOracle,
        now: u64,
        amount_in: U256,
        token_in: Address,
        token_out: Address,
    ) -> Result<U256> {
        Ok(self.quote(factory, oracle, now, amount_in, token_in, token_out)?.amount_out())
    }

    /// Swap an exact amount of `token_in` held by the caller
    ///
    /// # Security Checks
    /// - `deadline` must not be in the past
    /// - Neither pool may be paused
    /// - Output must be at least `min_amount_out`
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        to: Address,
        deadline: U256,
    ) -> Result<SwapQuote> {
        env.ensure_deadline(deadline)?;
        let quote = self.prepare(acc, env, token_in, token_out, amount_in, min_amount_out)?;

        acc.ledger.transfer_from(token_in, self.address, env.sender, self.address, amount_in)?;
        self.settle(acc, env, &quote, to)
    }

    /// Swap the native value attached to the call
    pub fn swap_exact_eth_for_tokens<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token_in: Address,
        token_out: Address,
        min_amount_out: U256,
        to: Address,
        deadline: U256,
    ) -> Result<SwapQuote> {
        env.ensure_deadline(deadline)?;
        if token_in != self.weth {
            return Err(SingularityError::InvalidInToken);
        }
        let amount_in = env.value;
        let quote = self.prepare(acc, env, token_in, token_out, amount_in, min_amount_out)?;

        acc.ledger.transfer_native(env.sender, self.address, amount_in)?;
        acc.ledger.wrap_native(self.weth, self.address, amount_in)?;
        self.settle(acc, env, &quote, to)
    }

    /// Swap into the wrapped native token and pay out native value
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_eth<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        to: Address,
        deadline: U256,
    ) -> Result<SwapQuote> {
        env.ensure_deadline(deadline)?;
        if token_out != self.weth {
            return Err(SingularityError::InvalidOutToken);
        }
        let quote = self.prepare(acc, env, token_in, token_out, amount_in, min_amount_out)?;

        acc.ledger.transfer_from(token_in, self.address, env.sender, self.address, amount_in)?;
        let quote = self.settle(acc, env, &quote, self.address)?;
        acc.ledger.unwrap_native(self.weth, self.address, quote.amount_out())?;
        acc.ledger.transfer_native(self.address, to, quote.amount_out())?;
        Ok(quote)
    }

    /// Checks shared by every swap variant, ending in a quote
    fn prepare<L: AssetLedger>(
        &self,
        acc: &Accounts<'_, L>,
        env: &Env,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
    ) -> Result<SwapQuote> {
        if token_in == token_out {
            return Err(SingularityError::IdenticalTokens);
        }
        self.pool(acc.factory, token_in)?.ensure_not_paused()?;
        self.pool(acc.factory, token_out)?.ensure_not_paused()?;

        let quote = self.quote(acc.factory, acc.oracle, env.timestamp, amount_in, token_in, token_out)?;
        if quote.amount_out() < min_amount_out {
            log::debug!(
                "Error: swap output {} below minimum {}",
                quote.amount_out(),
                min_amount_out
            );
            return Err(SingularityError::InsufficientOutputAmount);
        }
        Ok(quote)
    }

    /// Run both legs with the input already held by the router
    fn settle<L: AssetLedger>(
        &self,
        acc: &mut Accounts<'_, L>,
        env: &Env,
        quote: &SwapQuote,
        to: Address,
    ) -> Result<SwapQuote> {
        let ctx = acc.factory.pool_context();
        let router_env = env.as_caller(self.address);

        let pool_in = self.pool_mut(acc.factory, quote.token_in)?;
        acc.ledger.approve(quote.token_in, self.address, pool_in.address, quote.amount_in())?;
        let in_leg = pool_in.swap_in(&ctx, &router_env, acc.ledger, quote.amount_in())?;

        let pool_out = self.pool_mut(acc.factory, quote.token_out)?;
        let out_leg = pool_out.swap_out(
            &ctx,
            &router_env,
            acc.ledger,
            quote.out_leg.amount_requested,
            to,
        )?;

        log::debug!(
            "Swap: {} {} -> {} {} (${})",
            quote.amount_in(),
            quote.token_in,
            out_leg.amount_out,
            quote.token_out,
            quote.usd_value
        );
        Ok(SwapQuote { in_leg, out_leg, ..*quote })
    }
}
