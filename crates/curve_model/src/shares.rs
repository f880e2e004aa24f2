//! Claim-token share math
//!
//! Shares are priced off liabilities, not assets: a share redeems
//! `liabilities / total_supply` underlying units. Fees booked to liabilities
//! raise that price; slippage retained in assets does not.
//!
//! # Properties
//! - First deposit mints 1:1
//! - Deposit then full withdrawal with no swaps in between returns the exact amount
//! - Rounding always favours the pool

use alloy_primitives::U256;

use crate::math::{mul_div, WAD};
use crate::CurveError;

/// Shares minted for depositing `amount`
pub fn shares_for_deposit(
    amount: U256,
    liabilities: U256,
    total_supply: U256,
) -> Result<U256, CurveError> {
    if amount.is_zero() {
        return Err(CurveError::InvalidAmount);
    }
    if total_supply.is_zero() || liabilities.is_zero() {
        return Ok(amount);
    }
    mul_div(amount, total_supply, liabilities)
}

/// Underlying units redeemed by burning `shares`
pub fn amount_for_shares(
    shares: U256,
    liabilities: U256,
    total_supply: U256,
) -> Result<U256, CurveError> {
    if shares.is_zero() {
        return Err(CurveError::InvalidAmount);
    }
    if shares > total_supply {
        return Err(CurveError::InsufficientLiquidity);
    }
    mul_div(shares, liabilities, total_supply)
}

/// Redeemable underlying per share in WAD (1.0 when nothing is minted)
pub fn price_per_share(liabilities: U256, total_supply: U256) -> Result<U256, CurveError> {
    if total_supply.is_zero() {
        return Ok(WAD);
    }
    mul_div(liabilities, WAD, total_supply)
}
