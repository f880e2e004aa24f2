//! Coverage-ratio curve math - Imports the pure functions from curve_model
//!
//! Quotes and swaps both go through these functions. Do not re-derive the curve
//! here.

pub use curve_model::{
    self, amount_for_shares, coverage_ratio, leg_fee, penalty, price_per_share, shares_for_deposit,
    slippage_in, slippage_out, split_fee, wad_div, FeeSplit, WAD,
};
