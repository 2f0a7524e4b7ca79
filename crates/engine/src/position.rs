//! Position operations: deposit, mint, burn, redeem, and their composites.
//!
//! Each operation follows the same discipline: validate inputs, snapshot the
//! caller's position, mutate the ledgers, run the solvency checks, and only
//! then invoke external token capabilities. Any failure after the snapshot
//! restores it and surfaces the named error; events are staged and published
//! only on commit.

use alloy::primitives::{Address, U256};
use chrono::Utc;

use synthd_common::error::ProtocolError;
use synthd_common::types::EngineEvent;

use crate::engine::Engine;
use crate::ledger::Books;

impl Engine {
    /// Deposit `amount` of `asset` as collateral for `caller`.
    pub async fn deposit_collateral(
        &self,
        caller: Address,
        asset: Address,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(amount)?;
        self.require_registered(asset)?;

        let mut books = self.books.write().await;
        let snapshot = books.snapshot(self.oracle.assets(), caller);
        match self.deposit_inner(&mut books, caller, asset, amount) {
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

    /// Mint `amount` of the synthetic against `caller`'s collateral.
    pub async fn mint_synthetic(
        &self,
        caller: Address,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(amount)?;

        let mut books = self.books.write().await;
        let snapshot = books.snapshot(self.oracle.assets(), caller);
        match self.mint_inner(&mut books, caller, amount) {
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

    /// Deposit collateral and mint in one atomic unit; the mint-side health
    /// check covers the composite.
    pub async fn deposit_collateral_and_mint(
        &self,
        caller: Address,
        asset: Address,
        collateral_amount: U256,
        debt_amount: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(collateral_amount)?;
        self.require_positive(debt_amount)?;
        self.require_registered(asset)?;

        let mut books = self.books.write().await;
        let snapshot = books.snapshot(self.oracle.assets(), caller);
        match self.deposit_and_mint_inner(&mut books, caller, asset, collateral_amount, debt_amount)
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

    /// Burn `amount` of `caller`'s synthetic debt, funded from `caller`'s
    /// own synthetic balance.
    pub async fn burn_synthetic(
        &self,
        caller: Address,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(amount)?;

        let mut books = self.books.write().await;
        let snapshot = books.snapshot(self.oracle.assets(), caller);
        match self.burn_inner(&mut books, caller, amount) {
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

    /// Withdraw `amount` of `asset` back to `caller`. Redeeming can break
    /// solvency, so the health check is mandatory here.
    pub async fn redeem_collateral(
        &self,
        caller: Address,
        asset: Address,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(amount)?;
        self.require_registered(asset)?;

        let mut books = self.books.write().await;
        let snapshot = books.snapshot(self.oracle.assets(), caller);
        match self.redeem_inner(&mut books, caller, asset, amount) {
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

    /// Burn debt and withdraw collateral in one atomic unit. Debt shrinks
    /// before collateral, and the final health check is authoritative.
    pub async fn redeem_collateral_for_synthetic(
        &self,
        caller: Address,
        asset: Address,
        collateral_amount: U256,
        debt_amount: U256,
    ) -> Result<(), ProtocolError> {
        self.require_positive(collateral_amount)?;
        self.require_positive(debt_amount)?;
        self.require_registered(asset)?;

        let mut books = self.books.write().await;
        let snapshot = books.snapshot(self.oracle.assets(), caller);
        match self.redeem_for_synthetic_inner(
            &mut books,
            caller,
            asset,
            collateral_amount,
            debt_amount,
        ) {
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

    fn deposit_and_mint_inner(
        &self,
        books: &mut Books,
        caller: Address,
        asset: Address,
        collateral_amount: U256,
        debt_amount: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        // Both mutations land before the solvency check so the check sees
        // the composite position.
        books.collateral.credit(caller, asset, collateral_amount)?;
        books.debt.increase(caller, debt_amount)?;
        self.ensure_healthy(books, caller)?;

        if !self
            .collateral
            .transfer_from(asset, caller, self.custody, collateral_amount)
        {
            return Err(ProtocolError::TransferFailed);
        }
        if !self.issuer.mint(caller, debt_amount) {
            return Err(ProtocolError::MintFailed);
        }

        let at = Utc::now();
        Ok(vec![
            EngineEvent::CollateralDeposited {
                user: caller,
                asset,
                amount: collateral_amount,
                at,
            },
            EngineEvent::SyntheticMinted {
                user: caller,
                amount: debt_amount,
                at,
            },
        ])
    }

    fn redeem_for_synthetic_inner(
        &self,
        books: &mut Books,
        caller: Address,
        asset: Address,
        collateral_amount: U256,
        debt_amount: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        books.debt.decrease(caller, debt_amount)?;
        books.collateral.debit(caller, asset, collateral_amount)?;
        self.ensure_healthy(books, caller)?;

        if !self.issuer.transfer_from(caller, self.custody, debt_amount) {
            return Err(ProtocolError::TransferFailed);
        }
        self.issuer.burn(debt_amount);
        if !self.collateral.transfer(asset, caller, collateral_amount) {
            return Err(ProtocolError::TransferFailed);
        }

        let at = Utc::now();
        Ok(vec![
            EngineEvent::SyntheticBurned {
                on_behalf_of: caller,
                paid_by: caller,
                amount: debt_amount,
                at,
            },
            EngineEvent::CollateralRedeemed {
                from: caller,
                to: caller,
                asset,
                amount: collateral_amount,
                at,
            },
        ])
    }

    fn deposit_inner(
        &self,
        books: &mut Books,
        caller: Address,
        asset: Address,
        amount: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        books.collateral.credit(caller, asset, amount)?;

        // Ledger first, external pull last: a false return unwinds the
        // credit before anyone can observe it.
        if !self
            .collateral
            .transfer_from(asset, caller, self.custody, amount)
        {
            return Err(ProtocolError::TransferFailed);
        }

        Ok(vec![EngineEvent::CollateralDeposited {
            user: caller,
            asset,
            amount,
            at: Utc::now(),
        }])
    }

    fn mint_inner(
        &self,
        books: &mut Books,
        caller: Address,
        amount: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        books.debt.increase(caller, amount)?;
        self.ensure_healthy(books, caller)?;

        if !self.issuer.mint(caller, amount) {
            return Err(ProtocolError::MintFailed);
        }

        Ok(vec![EngineEvent::SyntheticMinted {
            user: caller,
            amount,
            at: Utc::now(),
        }])
    }

    fn burn_inner(
        &self,
        books: &mut Books,
        caller: Address,
        amount: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        books.debt.decrease(caller, amount)?;
        // Burning can only improve the factor; the check stays anyway so
        // the invariant holds at the end of every mutation.
        self.ensure_healthy(books, caller)?;

        if !self.issuer.transfer_from(caller, self.custody, amount) {
            return Err(ProtocolError::TransferFailed);
        }
        self.issuer.burn(amount);

        Ok(vec![EngineEvent::SyntheticBurned {
            on_behalf_of: caller,
            paid_by: caller,
            amount,
            at: Utc::now(),
        }])
    }

    fn redeem_inner(
        &self,
        books: &mut Books,
        caller: Address,
        asset: Address,
        amount: U256,
    ) -> Result<Vec<EngineEvent>, ProtocolError> {
        books.collateral.debit(caller, asset, amount)?;
        self.ensure_healthy(books, caller)?;

        if !self.collateral.transfer(asset, caller, amount) {
            return Err(ProtocolError::TransferFailed);
        }

        Ok(vec![EngineEvent::CollateralRedeemed {
            from: caller,
            to: caller,
            asset,
            amount,
            at: Utc::now(),
        }])
    }
}
