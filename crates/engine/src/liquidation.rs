//! Forced closure of undercollateralized positions.
//!
//! A liquidator covers part or all of a target's debt in exchange for the
//! equivalent collateral plus a bonus. The transition only commits if it
//! strictly improved the target's health factor and left the liquidator's
//! own position solvent.

use alloy::primitives::{Address, U256};
use chrono::Utc;

use synthd_common::error::ProtocolError;
use synthd_common::types::EngineEvent;

use crate::engine::Engine;
use crate::health::{self, LIQUIDATION_BONUS, LIQUIDATION_PRECISION};
use crate::ledger::Books;

impl Engine {
    /// Seize collateral from `user` and burn `debt_to_cover` of their debt,
    /// funded by `liquidator`'s own synthetic balance.
    ///
    /// Partial liquidation is supported: `debt_to_cover` may be any positive
    /// amount up to the target's outstanding debt. The seizure is not capped
    /// to the target's deposited balance of `asset`; under deep insolvency
    /// the debit fails with `InsufficientCollateral` and nothing commits.
    pub async fn liquidate(
        &self,
        liquidator: Address,
        user: Address,
        asset: Address,
        debt_to_cover: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(debt_to_cover)?;
        self.require_registered(asset)?;

        let mut books = self.books.write().await;

        let starting_factor = self.health_factor_locked(&books, user)?;
        if health::is_healthy(starting_factor) {
            return Err(ProtocolError::HealthFactorOk(starting_factor));
        }

        let snapshot = books.snapshot(self.oracle.assets(), user);
        match self.liquidate_inner(&mut books, liquidator, user, asset, debt_to_cover, starting_factor)
        {
            Ok(events) => {
                drop(books);
                self.publish(events);
                Ok(())
            }
            Err(err) => {
                books.restore(snapshot);
                Err(err)
            }
        }
    }

    fn liquidate_inner(
        &self,
        books: &mut Books,
        liquidator: Address,
        user: Address,
        asset: Address,
        debt_to_cover: U256,
        starting_factor: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        let seized_base = self.oracle.amount_from_usd(asset, debt_to_cover)?;
        let bonus = seized_base
            .checked_mul(LIQUIDATION_BONUS)
            .ok_or(ProtocolError::MathOverflow)?
            .checked_div(LIQUIDATION_PRECISION)
            .ok_or(ProtocolError::MathOverflow)?;
        let total_seized = seized_base
            .checked_add(bonus)
            .ok_or(ProtocolError::MathOverflow)?;

        books.collateral.debit(user, asset, total_seized)?;
        books.debt.decrease(user, debt_to_cover)?;

        let ending_factor = self.health_factor_locked(books, user)?;
        if ending_factor <= starting_factor {
            return Err(ProtocolError::HealthFactorNotImproved);
        }
        // The liquidator's own position must survive the operation too.
        self.ensure_healthy(books, liquidator)?;

        if !self.collateral.transfer(asset, liquidator, total_seized) {
            return Err(ProtocolError::TransferFailed);
        }
        if !self
            .issuer
            .transfer_from(liquidator, self.custody, debt_to_cover)
        {
            return Err(ProtocolError::TransferFailed);
        }
        self.issuer.burn(debt_to_cover);

        tracing::info!(
            user = %user,
            liquidator = %liquidator,
            starting_factor = %starting_factor,
            ending_factor = %ending_factor,
            "position liquidated"
        );

        Ok(vec![EngineEvent::PositionLiquidated {
            user,
            liquidator,
            asset,
            debt_covered: debt_to_cover,
            collateral_seized: total_seized,
            at: Utc::now(),
        }])
    }
}
