//! Health factor calculation and the protocol risk constants.
//!
//! The health factor is the 18-decimal ratio of risk-adjusted collateral
//! value to outstanding debt. Only half of nominal collateral value counts
//! toward solvency, so a factor of exactly 1.0 corresponds to 200%
//! overcollateralization. A position with no debt is never at risk and
//! reports the maximum representable factor.

use alloy::primitives::U256;

use synthd_common::error::ProtocolError;
use synthd_oracle::PRECISION;

/// Share of nominal collateral value counted toward solvency, out of
/// [`LIQUIDATION_PRECISION`].
pub const LIQUIDATION_THRESHOLD: U256 = U256::from_limbs([50, 0, 0, 0]);

/// Denominator for [`LIQUIDATION_THRESHOLD`] and [`LIQUIDATION_BONUS`].
pub const LIQUIDATION_PRECISION: U256 = U256::from_limbs([100, 0, 0, 0]);

/// Extra share of seized collateral paid to a liquidator.
pub const LIQUIDATION_BONUS: U256 = U256::from_limbs([10, 0, 0, 0]);

/// Minimum allowed health factor: 1.0 at 18 decimals.
pub const MIN_HEALTH_FACTOR: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]); // 10^18

/// Health factor for a position with `debt` outstanding against
/// `collateral_usd` of collateral (both 18 decimals).
///
/// Pure and deterministic; usable by external callers without touching
/// engine state.
pub fn health_factor(debt: U256, collateral_usd: U256) -> Result<U256, ProtocolError> {
    if debt.is_zero() {
        return Ok(U256::MAX);
    }

    let adjusted = collateral_usd
        .checked_mul(LIQUIDATION_THRESHOLD)
        .ok_or(ProtocolError::MathOverflow)?
        .checked_div(LIQUIDATION_PRECISION)
        .ok_or(ProtocolError::MathOverflow)?;

    adjusted
        .checked_mul(PRECISION)
        .ok_or(ProtocolError::MathOverflow)?
        .checked_div(debt)
        .ok_or(ProtocolError::MathOverflow)
}

/// Whether `factor` satisfies the protocol minimum.
pub fn is_healthy(factor: U256) -> bool {
    factor >= MIN_HEALTH_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(units: u64) -> U256 {
        U256::from(units) * PRECISION
    }

    #[test]
    fn test_zero_debt_is_never_at_risk() {
        assert_eq!(health_factor(U256::ZERO, U256::ZERO).unwrap(), U256::MAX);
        assert_eq!(health_factor(U256::ZERO, usd(1_000_000)).unwrap(), U256::MAX);
    }

    #[test]
    fn test_factor_for_comfortable_position() {
        // 20000 USD collateral against 100 debt: factor 100.0
        let factor = health_factor(usd(100), usd(20_000)).unwrap();
        assert_eq!(factor, usd(100));
        assert!(is_healthy(factor));
    }

    #[test]
    fn test_factor_below_minimum_after_price_drop() {
        // 180 USD collateral against 100 debt: factor 0.9
        let factor = health_factor(usd(100), usd(180)).unwrap();
        assert_eq!(factor, usd(9) / U256::from(10));
        assert!(!is_healthy(factor));
    }

    #[test]
    fn test_exact_minimum_is_healthy() {
        // 200 USD collateral against 100 debt: factor exactly 1.0
        let factor = health_factor(usd(100), usd(200)).unwrap();
        assert_eq!(factor, MIN_HEALTH_FACTOR);
        assert!(is_healthy(factor));
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let err = health_factor(U256::from(1), U256::MAX).unwrap_err();
        assert_eq!(err, ProtocolError::MathOverflow);
    }
}
