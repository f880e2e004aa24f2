//! Coverage-ratio slippage curve
//!
//! The penalty function is
//!
//! ```text
//! g(c) = A / c^8        A = 3e-5, capped at 1.0, zero for c >= 100
//! ```
//!
//! where `c = assets / liabilities`. Moving a pool from coverage `c0` to `c1`
//! costs (or earns) `liabilities * |g(c1) - g(c0)|` underlying units:
//! - swap-out lowers coverage, the trader pays `L * (g(c1) - g(c0))` and the
//!   slippage stays in the pool
//! - swap-in raises coverage, the trader earns `L * (g(c0) - g(c1))`, which the
//!   pool caps against its fee buffer
//!
//! `g` is continuous and non-increasing in `c`, so slippage grows as a pool
//! drains and vanishes once it is well covered.

use alloy_primitives::U256;

use crate::math::{coverage_ratio, mul_div, wad_div, wad_mul, WAD};
use crate::CurveError;

/// Curve amplitude `A` (3e-5 in WAD)
pub const PENALTY_AMPLITUDE: U256 = U256::from_limbs([30_000_000_000_000, 0, 0, 0]);

/// Coverage above which the penalty is treated as zero (100.0 in WAD)
pub const PENALTY_CUTOFF: U256 = U256::from_limbs([7_766_279_631_452_241_920, 5, 0, 0]);

/// Share of each leg's fee booked as admin fees (25%)
pub const ADMIN_FEE_SHARE: U256 = U256::from_limbs([250_000_000_000_000_000, 0, 0, 0]);

/// Share of each leg's fee booked as locked fees (25%)
pub const LOCKED_FEE_SHARE: U256 = U256::from_limbs([250_000_000_000_000_000, 0, 0, 0]);

/// Penalty `g(c)` in WAD
pub fn penalty(coverage: U256) -> U256 {
    if coverage >= PENALTY_CUTOFF {
        return U256::ZERO;
    }
    // c < 100 keeps every intermediate well inside U256
    let c2 = coverage * coverage / WAD;
    let c4 = c2 * c2 / WAD;
    let c8 = c4 * c4 / WAD;
    if c8.is_zero() {
        return WAD;
    }
    let g = PENALTY_AMPLITUDE * WAD / c8;
    g.min(WAD)
}

/// Slippage charged for removing `amount` from a pool
///
/// # Arguments
/// * `amount` - Underlying units leaving the pool before slippage
/// * `assets` - Current pool assets
/// * `liabilities` - Current pool liabilities
///
/// # Returns
/// * Underlying units withheld from the trader
/// * `CurveError::InsufficientLiquidity` if the pool has no liabilities or
///   `amount` would empty it
pub fn slippage_out(amount: U256, assets: U256, liabilities: U256) -> Result<U256, CurveError> {
    if amount.is_zero() {
        return Err(CurveError::InvalidAmount);
    }
    if liabilities.is_zero() || amount >= assets {
        return Err(CurveError::InsufficientLiquidity);
    }

    let c0 = coverage_ratio(assets, liabilities)?;
    let c1 = wad_div(assets - amount, liabilities)?;

    let g0 = penalty(c0);
    let g1 = penalty(c1);
    wad_mul(liabilities, g1.saturating_sub(g0))
}

/// Rebate earned for adding `amount` to a pool
///
/// Returns zero for a pool without liabilities. The caller caps the rebate.
pub fn slippage_in(amount: U256, assets: U256, liabilities: U256) -> Result<U256, CurveError> {
    if amount.is_zero() {
        return Err(CurveError::InvalidAmount);
    }
    if liabilities.is_zero() {
        return Ok(U256::ZERO);
    }

    let c0 = coverage_ratio(assets, liabilities)?;
    let new_assets = assets.checked_add(amount).ok_or(CurveError::Overflow)?;
    let c1 = wad_div(new_assets, liabilities)?;

    let g0 = penalty(c0);
    let g1 = penalty(c1);
    wad_mul(liabilities, g0.saturating_sub(g1))
}

/// Fee charged on one swap leg: half of the pool's base fee
#[inline]
pub fn leg_fee(amount: U256, base_fee: U256) -> Result<U256, CurveError> {
    mul_div(amount, base_fee, WAD * U256::from(2))
}

/// Fee split between LPs, the admin and the locked buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeSplit {
    /// Added to liabilities (raises price-per-share)
    pub lp: U256,
    /// Added to admin fees (swept by the factory)
    pub admin: U256,
    /// Added to locked fees (funds swap-in rebates)
    pub locked: U256,
}

impl FeeSplit {
    pub fn total(&self) -> U256 {
        self.lp + self.admin + self.locked
    }
}

/// Split a fee. The LP share absorbs rounding so the parts sum to `fee`.
pub fn split_fee(fee: U256) -> Result<FeeSplit, CurveError> {
    let admin = wad_mul(fee, ADMIN_FEE_SHARE)?;
    let locked = wad_mul(fee, LOCKED_FEE_SHARE)?;
    Ok(FeeSplit {
        lp: fee - admin - locked,
        admin,
        locked,
    })
}
