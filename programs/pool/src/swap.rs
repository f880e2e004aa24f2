//! Swap legs
//!
//! A swap is two legs on two pools. The in-leg takes the trader's tokens,
//! charges half the base fee and may pay a rebate out of locked fees when it
//! lifts a drained pool. The out-leg charges curve slippage plus half the base
//! fee and pays the remainder.
//!
//! Quotes are pure. The mutating legs re-run the same quote and apply it.

use singularity_common::{Address, AssetLedger, Env, Result, SingularityError, U256};

use crate::math::{leg_fee, slippage_in, slippage_out, split_fee, wad_div, FeeSplit};
use crate::state::{Pool, PoolContext};

/// Breakdown of an in-leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapInQuote {
    pub amount_in: U256,
    pub fee: FeeSplit,
    /// Paid from locked fees, never more than the fee
    pub rebate: U256,
    /// Amount credited to the trader: `amount_in - fee + rebate`
    pub amount_post: U256,
}

/// Breakdown of an out-leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapOutQuote {
    pub amount_requested: U256,
    /// Retained by the pool
    pub slippage: U256,
    pub fee: FeeSplit,
    /// Paid to the recipient
    pub amount_out: U256,
}

impl Pool {
    /// Price an in-leg of `amount` against the current state
    pub fn quote_swap_in(&self, amount: U256) -> Result<SwapInQuote> {
        if amount.is_zero() {
            return Err(SingularityError::AmountIsZero);
        }
        let fee = split_fee(leg_fee(amount, self.base_fee)?)?;
        let rebate = slippage_in(amount, self.assets, self.liabilities)?
            .min(fee.total())
            .min(self.locked_fees);

        Ok(SwapInQuote {
            amount_in: amount,
            fee,
            rebate,
            amount_post: amount - fee.total() + rebate,
        })
    }

    /// Price an out-leg requesting `amount` against the current state
    ///
    /// # Returns
    /// * `InsufficientLiquidity` when the request exceeds free assets, the
    ///   slippage eats the whole request, or the pool would end below
    ///   `coverage_floor`
    pub fn quote_swap_out(&self, amount: U256, coverage_floor: U256) -> Result<SwapOutQuote> {
        if amount.is_zero() {
            return Err(SingularityError::AmountIsZero);
        }
        if amount > self.free_assets() {
            log::debug!("Error: swap-out of {} exceeds free assets on {}", amount, self.address);
            return Err(SingularityError::InsufficientLiquidity);
        }

        let slippage = slippage_out(amount, self.assets, self.liabilities)?;
        if slippage >= amount {
            return Err(SingularityError::InsufficientLiquidity);
        }
        let net = amount - slippage;
        let fee = split_fee(leg_fee(net, self.base_fee)?)?;
        let amount_out = net - fee.total();

        let coverage = wad_div(self.assets - amount_out, self.liabilities + fee.lp)?;
        if coverage < coverage_floor {
            log::debug!(
                "Error: swap-out leaves {} at coverage {} below floor {}",
                self.address,
                coverage,
                coverage_floor
            );
            return Err(SingularityError::InsufficientLiquidity);
        }

        Ok(SwapOutQuote { amount_requested: amount, slippage, fee, amount_out })
    }

    /// Book a leg's fee. Liabilities are owed to share holders, so a pool
    /// without shares keeps the LP part in locked fees.
    fn book_fee(&mut self, fee: &FeeSplit) {
        if self.claim.total_supply.is_zero() {
            self.locked_fees += fee.lp;
        } else {
            self.liabilities += fee.lp;
        }
        self.admin_fees += fee.admin;
        self.locked_fees += fee.locked;
    }

    /// Take `amount` from the router into the pool
    pub fn swap_in<L: AssetLedger>(
        &mut self,
        ctx: &PoolContext,
        env: &Env,
        ledger: &mut L,
        amount: U256,
    ) -> Result<SwapInQuote> {
        self.ensure_router(ctx, env)?;
        self.ensure_not_paused()?;
        let quote = self.quote_swap_in(amount)?;

        self.assets += amount;
        self.book_fee(&quote.fee);
        self.locked_fees -= quote.rebate;

        ledger.transfer_from(self.token, self.address, env.sender, self.address, amount)?;

        log::debug!(
            "Swap in: {} into {} (fee {}, rebate {})",
            amount,
            self.address,
            quote.fee.total(),
            quote.rebate
        );
        Ok(quote)
    }

    /// Pay out `amount` less slippage and fee to `to`
    pub fn swap_out<L: AssetLedger>(
        &mut self,
        ctx: &PoolContext,
        env: &Env,
        ledger: &mut L,
        amount: U256,
        to: Address,
    ) -> Result<SwapOutQuote> {
        self.ensure_router(ctx, env)?;
        self.ensure_not_paused()?;
        let quote = self.quote_swap_out(amount, ctx.coverage_floor)?;

        self.assets -= quote.amount_out;
        self.book_fee(&quote.fee);

        self.pay(ledger, to, quote.amount_out)?;

        log::debug!(
            "Swap out: {} from {} to {} (slippage {}, fee {})",
            quote.amount_out,
            self.address,
            to,
            quote.slippage,
            quote.fee.total()
        );
        Ok(quote)
    }
}
