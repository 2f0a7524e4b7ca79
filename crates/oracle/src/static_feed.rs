//! In-process price feed with a settable price.
//!
//! Stands in for a real market feed in tests and sandbox deployments. The
//! price is whatever was last stored; there is no history and no metadata,
//! matching the narrow [`PriceFeed`](crate::PriceFeed) contract.

use std::sync::RwLock;

use alloy::primitives::I256;

use crate::PriceFeed;

pub struct StaticFeed {
    price: RwLock<I256>,
}

impl StaticFeed {
    pub fn new(price: I256) -> Self {
        Self {
            price: RwLock::new(price),
        }
    }

    /// Replace the reported price. Takes effect on the next read.
    pub fn set_price(&self, price: I256) {
        *self.price.write().unwrap_or_else(|e| e.into_inner()) = price;
    }
}

impl PriceFeed for StaticFeed {
    fn latest_price(&self) -> I256 {
        *self.price.read().unwrap_or_else(|e| e.into_inner())
    }
}
