//! Curve Model - Pure coverage-ratio curve and share math
//!
//! This crate contains the pricing core of a single-sided, oracle-priced pool
//! with no ledger, token or oracle types. `programs/pool` imports these
//! functions directly so the quote path and the swap path share one
//! implementation.
//!
//! All values are `U256`. Ratios and fees are WAD fixed point (1.0 = 1e18).

pub mod curve;
pub mod math;
pub mod shares;

pub use curve::{leg_fee, penalty, slippage_in, slippage_out, split_fee, FeeSplit};
pub use math::{coverage_ratio, mul_div, wad_div, wad_mul, WAD};
pub use shares::{amount_for_shares, price_per_share, shares_for_deposit};

/// Error types for curve operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Invalid amount (zero, or larger than the pool can express)
    InvalidAmount,
    /// Pool cannot honour the requested outflow
    InsufficientLiquidity,
    /// Arithmetic overflow
    Overflow,
}
