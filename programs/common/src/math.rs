//! Fixed-point math utilities

use alloy_primitives::U256;

use crate::{Result, SingularityError};

pub use curve_model::math::{coverage_ratio, mul_div, wad_div, wad_mul, WAD};

/// Oracle price precision (18 decimals, USD)
pub const PRICE_DECIMALS: u8 = 18;

/// `10^decimals`
#[inline]
pub fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Convert a raw token amount into USD (18 decimals)
///
/// `usd = amount * price / 10^decimals`
#[inline]
pub fn amount_to_usd(amount: U256, price: U256, decimals: u8) -> Result<U256> {
    Ok(mul_div(amount, price, pow10(decimals))?)
}

/// Convert a USD value (18 decimals) into raw token units, rounding down
///
/// `amount = usd * 10^decimals / price`
#[inline]
pub fn usd_to_amount(usd: U256, price: U256, decimals: u8) -> Result<U256> {
    if price.is_zero() {
        return Err(SingularityError::InvalidOraclePrice);
    }
    Ok(mul_div(usd, pow10(decimals), price)?)
}

/// Parse a decimal string ("1.5") into raw units with `decimals` places
pub fn parse_units(value: &str, decimals: u8) -> Option<U256> {
    let value = value.trim();
    let (whole, frac) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if frac.len() > decimals as usize {
        return None;
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole = if whole.is_empty() { U256::ZERO } else { whole.parse::<U256>().ok()? };
    let mut frac_units = if frac.is_empty() { U256::ZERO } else { frac.parse::<U256>().ok()? };
    frac_units = frac_units.checked_mul(pow10(decimals - frac.len() as u8))?;

    whole.checked_mul(pow10(decimals))?.checked_add(frac_units)
}

/// Format raw units as a decimal string, trimming trailing zeros
pub fn format_units(value: U256, decimals: u8) -> String {
    let scale = pow10(decimals);
    let whole = value / scale;
    let frac = value % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
