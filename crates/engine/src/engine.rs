//! The engine: shared books, construction, read surface, event publication.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tokio::sync::{RwLock, broadcast};

use synthd_common::error::ProtocolError;
use synthd_common::types::EngineEvent;
use synthd_oracle::{PriceFeed, PriceOracle};

use crate::health;
use crate::ledger::Books;
use crate::tokens::{CollateralTokens, SyntheticIssuer};

/// Buffered events per subscriber before lagging receivers drop messages.
const EVENT_BUFFER: usize = 256;

/// The synthetic-dollar issuance engine.
///
/// All positions live in the books behind a single writer lock: mutating
/// operations hold the write guard for their entire execution, which
/// serializes them and reproduces the one-at-a-time transaction model the
/// accounting rules assume. The lock is not reentrant, so a foreign callee
/// that tried to re-enter mid-operation would block rather than observe
/// stale state.
pub struct Engine {
    pub(crate) custody: Address,
    pub(crate) oracle: PriceOracle,
    pub(crate) collateral: Arc<dyn CollateralTokens>,
    pub(crate) issuer: Arc<dyn SyntheticIssuer>,
    pub(crate) books: RwLock<Books>,
    pub(crate) events: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Build an engine over two parallel lists binding each collateral asset
    /// to its price feed. The asset set and feed bindings are immutable for
    /// the engine's lifetime.
    ///
    /// `custody` is the engine's pooled-custody account: deposits are pulled
    /// into it and burns are funded from it.
    pub fn new(
        custody: Address,
        assets: Vec<Address>,
        feeds: Vec<Arc<dyn PriceFeed>>,
        collateral: Arc<dyn CollateralTokens>,
        issuer: Arc<dyn SyntheticIssuer>,
    ) -> Result<Self, ProtocolError> {
        let oracle = PriceOracle::new(assets, feeds)?;
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Ok(Self {
            custody,
            oracle,
            collateral,
            issuer,
            books: RwLock::new(Books::default()),
            events,
        })
    }

    /// Subscribe to committed engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// The engine's pooled-custody account id.
    pub fn custody(&self) -> Address {
        self.custody
    }

    /// Registered collateral assets in construction order.
    pub fn collateral_assets(&self) -> &[Address] {
        self.oracle.assets()
    }

    /// The price feed bound to `asset`, if registered.
    pub fn price_feed(&self, asset: Address) -> Option<Arc<dyn PriceFeed>> {
        self.oracle.feed(asset)
    }

    /// USD value (18 decimals) of `amount` units of `asset` at the current
    /// feed price.
    pub fn usd_value(&self, asset: Address, amount: U256) -> Result<U256, ProtocolError> {
        self.oracle.usd_value(asset, amount)
    }

    /// Units of `asset` worth `usd_amount` at the current feed price.
    pub fn amount_from_usd(&self, asset: Address, usd_amount: U256) -> Result<U256, ProtocolError> {
        self.oracle.amount_from_usd(asset, usd_amount)
    }

    /// Deposited balance for `(user, asset)`.
    pub async fn collateral_balance(&self, user: Address, asset: Address) -> U256 {
        self.books.read().await.collateral.balance(user, asset)
    }

    /// Aggregate USD valuation of `user`'s deposited collateral.
    pub async fn total_collateral_value_usd(&self, user: Address) -> Result<U256, ProtocolError> {
        let books = self.books.read().await;
        self.collateral_value_locked(&books, user)
    }

    /// `user`'s outstanding debt and aggregate collateral valuation.
    pub async fn account_information(
        &self,
        user: Address,
    ) -> Result<(U256, U256), ProtocolError> {
        let books = self.books.read().await;
        let debt = books.debt.debt_of(user);
        let collateral_usd = self.collateral_value_locked(&books, user)?;
        Ok((debt, collateral_usd))
    }

    /// `user`'s current health factor.
    pub async fn health_factor(&self, user: Address) -> Result<U256, ProtocolError> {
        let books = self.books.read().await;
        self.health_factor_locked(&books, user)
    }

    pub(crate) fn collateral_value_locked(
        &self,
        books: &Books,
        user: Address,
    ) -> Result<U256, ProtocolError> {
        let mut total = U256::ZERO;
        for &asset in self.oracle.assets() {
            let amount = books.collateral.balance(user, asset);
            if amount.is_zero() {
                continue;
            }
            let value = self.oracle.usd_value(asset, amount)?;
            total = total.checked_add(value).ok_or(ProtocolError::MathOverflow)?;
        }
        Ok(total)
    }

    pub(crate) fn health_factor_locked(
        &self,
        books: &Books,
        user: Address,
    ) -> Result<U256, ProtocolError> {
        let debt = books.debt.debt_of(user);
        let collateral_usd = self.collateral_value_locked(books, user)?;
        health::health_factor(debt, collateral_usd)
    }

    /// Fail with `BreaksHealthFactor` if `user`'s position sits below the
    /// minimum.
    pub(crate) fn ensure_healthy(
        &self,
        books: &Books,
        user: Address,
    ) -> Result<(), ProtocolError> {
        let factor = self.health_factor_locked(books, user)?;
        if !health::is_healthy(factor) {
            return Err(ProtocolError::BreaksHealthFactor(factor));
        }
        Ok(())
    }

    pub(crate) fn require_positive(&self, amount: U256) -> Result<(), ProtocolError> {
        if amount.is_zero() {
            return Err(ProtocolError::ZeroAmount);
        }
        Ok(())
    }

    pub(crate) fn require_registered(&self, asset: Address) -> Result<(), ProtocolError> {
        if !self.oracle.is_registered(asset) {
            return Err(ProtocolError::InvalidAsset(asset));
        }
        Ok(())
    }

    /// Publish the staged events of a committed operation.
    pub(crate) fn publish(&self, events: Vec<EngineEvent>) {
        for event in events {
            tracing::info!(event = %event, detail = ?event, "engine event");
            // Nobody listening is fine; the books are the source of truth.
            let _ = self.events.send(event);
        }
    }
}
