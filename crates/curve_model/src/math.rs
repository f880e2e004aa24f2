//! WAD fixed-point helpers

use alloy_primitives::U256;

use crate::CurveError;

/// Fixed-point scale (1e18)
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// `a * b / denominator`, rounding down
#[inline]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, CurveError> {
    if denominator.is_zero() {
        return Err(CurveError::Overflow);
    }
    let product = a.checked_mul(b).ok_or(CurveError::Overflow)?;
    Ok(product / denominator)
}

/// `a * b / WAD`
#[inline]
pub fn wad_mul(a: U256, b: U256) -> Result<U256, CurveError> {
    mul_div(a, b, WAD)
}

/// `a * WAD / b`
#[inline]
pub fn wad_div(a: U256, b: U256) -> Result<U256, CurveError> {
    mul_div(a, WAD, b)
}

/// Coverage ratio `assets / liabilities` in WAD
///
/// Saturates to `U256::MAX` when there are no liabilities.
#[inline]
pub fn coverage_ratio(assets: U256, liabilities: U256) -> Result<U256, CurveError> {
    if liabilities.is_zero() {
        return Ok(U256::MAX);
    }
    wad_div(assets, liabilities)
}
