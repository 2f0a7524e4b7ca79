//! Price oracle adapter.
//!
//! Wraps one external price source per collateral asset behind the narrow
//! [`PriceFeed`] trait and converts between asset amounts and 18-decimal USD
//! values:
//! 1. Read the latest 8-decimal feed price (no caching, no staleness check;
//!    freshness is the feed's contract)
//! 2. Normalize to the 18-decimal accounting scale
//! 3. Convert amount ↔ USD with checked fixed-point arithmetic

pub mod static_feed;

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address, I256, U256};

use synthd_common::error::ProtocolError;

pub use static_feed::StaticFeed;

/// Decimal precision of raw feed prices.
pub const FEED_DECIMALS: u32 = 8;

/// Multiplier aligning an 8-decimal feed price with the 18-decimal
/// accounting scale.
pub const FEED_PRECISION_SCALE: U256 = U256::from_limbs([10_000_000_000, 0, 0, 0]); // 10^10

/// The internal accounting scale: all USD values, debt amounts, and health
/// factors carry 18 implied decimals.
pub const PRECISION: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]); // 10^18

/// Narrow read interface onto an external price source.
///
/// Prices are fixed-point with [`FEED_DECIMALS`] decimals. The adapter
/// consults no round or timestamp metadata.
pub trait PriceFeed: Send + Sync {
    fn latest_price(&self) -> I256;
}

/// Per-asset price feed registry and valuation adapter.
///
/// The asset set is fixed at construction; enumeration order matches
/// construction order and is observable through [`PriceOracle::assets`]
/// (aggregate valuation iterates it).
pub struct PriceOracle {
    feeds: HashMap<Address, Arc<dyn PriceFeed>>,
    order: Vec<Address>,
}

impl PriceOracle {
    /// Bind each asset to its price feed from two parallel lists.
    pub fn new(
        assets: Vec<Address>,
        feeds: Vec<Arc<dyn PriceFeed>>,
    ) -> Result<Self, ProtocolError> {
        if assets.len() != feeds.len() {
            return Err(ProtocolError::LengthMismatch);
        }

        let mut registry = HashMap::with_capacity(assets.len());
        let mut order = Vec::with_capacity(assets.len());
        for (asset, feed) in assets.into_iter().zip(feeds) {
            // A repeated asset rebinds its feed rather than double-counting
            // the entry during aggregate valuation.
            if registry.insert(asset, feed).is_none() {
                order.push(asset);
            }
        }

        Ok(Self {
            feeds: registry,
            order,
        })
    }

    /// Registered assets in construction order.
    pub fn assets(&self) -> &[Address] {
        &self.order
    }

    pub fn is_registered(&self, asset: Address) -> bool {
        self.feeds.contains_key(&asset)
    }

    /// The feed bound to `asset`, if registered.
    pub fn feed(&self, asset: Address) -> Option<Arc<dyn PriceFeed>> {
        self.feeds.get(&asset).cloned()
    }

    /// Latest feed price scaled to 18 decimals.
    ///
    /// Fails with `InvalidAsset` for unregistered assets and `InvalidPrice`
    /// for non-positive raw prices; the signed→unsigned conversion is
    /// checked, never a wrapping cast.
    pub fn normalized_price(&self, asset: Address) -> Result<U256, ProtocolError> {
        let feed = self
            .feeds
            .get(&asset)
            .ok_or(ProtocolError::InvalidAsset(asset))?;

        let raw = feed.latest_price();
        if raw <= I256::ZERO {
            return Err(ProtocolError::InvalidPrice(raw));
        }
        tracing::trace!(asset = %asset, price = %raw, "read price feed");

        raw.into_raw()
            .checked_mul(FEED_PRECISION_SCALE)
            .ok_or(ProtocolError::MathOverflow)
    }

    /// USD value (18 decimals) of `amount` units of `asset`.
    pub fn usd_value(&self, asset: Address, amount: U256) -> Result<U256, ProtocolError> {
        let price = self.normalized_price(asset)?;
        amount
            .checked_mul(price)
            .ok_or(ProtocolError::MathOverflow)?
            .checked_div(PRECISION)
            .ok_or(ProtocolError::MathOverflow)
    }

    /// Units of `asset` worth `usd_amount` (18-decimal USD) at the current
    /// price. Truncates toward zero by at most one base unit.
    pub fn amount_from_usd(&self, asset: Address, usd_amount: U256) -> Result<U256, ProtocolError> {
        let price = self.normalized_price(asset)?;
        usd_amount
            .checked_mul(PRECISION)
            .ok_or(ProtocolError::MathOverflow)?
            .checked_div(price)
            .ok_or(ProtocolError::MathOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    /// 8-decimal raw feed price from a whole-dollar amount.
    fn raw_price(usd: u64) -> I256 {
        I256::from_raw(U256::from(usd) * U256::from(100_000_000u64))
    }

    fn ether(units: u64) -> U256 {
        U256::from(units) * PRECISION
    }

    fn make_oracle(price: I256) -> (PriceOracle, Address) {
        let asset = addr(0x11);
        let feed = Arc::new(StaticFeed::new(price));
        let oracle = PriceOracle::new(vec![asset], vec![feed]).unwrap();
        (oracle, asset)
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = PriceOracle::new(vec![addr(0x11), addr(0x22)], vec![]);
        assert_eq!(result.err(), Some(ProtocolError::LengthMismatch));
    }

    #[test]
    fn test_usd_value_at_2000() {
        // 15 units at 2000 USD each = 30000 USD (18 decimals)
        let (oracle, asset) = make_oracle(raw_price(2000));
        let value = oracle.usd_value(asset, ether(15)).unwrap();
        assert_eq!(value, ether(30_000));
    }

    #[test]
    fn test_amount_from_usd_at_2000() {
        // 100 USD at 2000 USD/unit = 0.05 units
        let (oracle, asset) = make_oracle(raw_price(2000));
        let amount = oracle.amount_from_usd(asset, ether(100)).unwrap();
        assert_eq!(amount, PRECISION / U256::from(20));
    }

    #[test]
    fn test_round_trip_within_one_base_unit() {
        let (oracle, asset) = make_oracle(raw_price(2000));
        let amount = ether(7);
        let back = oracle
            .amount_from_usd(asset, oracle.usd_value(asset, amount).unwrap())
            .unwrap();
        assert!(amount - back <= U256::from(1));
    }

    #[test]
    fn test_unregistered_asset_rejected() {
        let (oracle, _) = make_oracle(raw_price(2000));
        let stranger = addr(0x99);
        assert_eq!(
            oracle.usd_value(stranger, ether(1)).err(),
            Some(ProtocolError::InvalidAsset(stranger))
        );
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let (oracle, asset) = make_oracle(I256::ZERO);
        assert_eq!(
            oracle.usd_value(asset, ether(1)).err(),
            Some(ProtocolError::InvalidPrice(I256::ZERO))
        );

        let negative = -I256::from_raw(U256::from(1));
        let (oracle, asset) = make_oracle(negative);
        assert_eq!(
            oracle.usd_value(asset, ether(1)).err(),
            Some(ProtocolError::InvalidPrice(negative))
        );
    }

    #[test]
    fn test_assets_keep_construction_order() {
        let feed = || Arc::new(StaticFeed::new(raw_price(1))) as Arc<dyn PriceFeed>;
        let oracle = PriceOracle::new(
            vec![addr(0x33), addr(0x11), addr(0x22)],
            vec![feed(), feed(), feed()],
        )
        .unwrap();
        assert_eq!(oracle.assets(), &[addr(0x33), addr(0x11), addr(0x22)]);
    }

    #[test]
    fn test_price_update_flows_through_valuation() {
        // No caching: a feed update is visible on the very next read.
        let asset = addr(0x11);
        let feed = Arc::new(StaticFeed::new(raw_price(2000)));
        let oracle = PriceOracle::new(vec![asset], vec![feed.clone()]).unwrap();

        assert_eq!(oracle.usd_value(asset, ether(1)).unwrap(), ether(2000));
        feed.set_price(raw_price(18));
        assert_eq!(oracle.usd_value(asset, ether(1)).unwrap(), ether(18));
    }
}
