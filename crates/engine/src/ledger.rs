//! Collateral and debt bookkeeping.
//!
//! The ledgers are the authoritative claim record: collateral custody is
//! pooled in the engine's account, and a user's entitlement exists only as
//! an entry here. Entries are created implicitly on first use and never
//! deleted, only zeroed. All mutation is checked arithmetic that fails
//! loudly rather than wrapping.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use synthd_common::error::ProtocolError;

/// Per-user, per-asset deposited collateral.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollateralLedger {
    balances: HashMap<Address, HashMap<Address, U256>>,
}

impl CollateralLedger {
    /// Deposited amount for `(user, asset)`; zero when no entry exists.
    pub fn balance(&self, user: Address, asset: Address) -> U256 {
        self.balances
            .get(&user)
            .and_then(|assets| assets.get(&asset))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn credit(
        &mut self,
        user: Address,
        asset: Address,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        let entry = self
            .balances
            .entry(user)
            .or_default()
            .entry(asset)
            .or_insert(U256::ZERO);
        *entry = entry.checked_add(amount).ok_or(ProtocolError::MathOverflow)?;
        Ok(())
    }

    /// Fails with `InsufficientCollateral` when the entry would go negative.
    pub fn debit(
        &mut self,
        user: Address,
        asset: Address,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        let entry = self
            .balances
            .entry(user)
            .or_default()
            .entry(asset)
            .or_insert(U256::ZERO);
        *entry = entry
            .checked_sub(amount)
            .ok_or(ProtocolError::InsufficientCollateral)?;
        Ok(())
    }

    fn put(&mut self, user: Address, asset: Address, amount: U256) {
        self.balances
            .entry(user)
            .or_default()
            .insert(asset, amount);
    }
}

/// Per-user outstanding synthetic debt, 18 implied decimals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DebtLedger {
    debts: HashMap<Address, U256>,
}

impl DebtLedger {
    pub fn debt_of(&self, user: Address) -> U256 {
        self.debts.get(&user).copied().unwrap_or(U256::ZERO)
    }

    pub fn increase(&mut self, user: Address, amount: U256) -> Result<(), ProtocolError> {
        let entry = self.debts.entry(user).or_insert(U256::ZERO);
        *entry = entry.checked_add(amount).ok_or(ProtocolError::MathOverflow)?;
        Ok(())
    }

    /// Fails with `BurnExceedsDebt` when `amount` exceeds the outstanding
    /// debt.
    pub fn decrease(&mut self, user: Address, amount: U256) -> Result<(), ProtocolError> {
        let entry = self.debts.entry(user).or_insert(U256::ZERO);
        *entry = entry
            .checked_sub(amount)
            .ok_or(ProtocolError::BurnExceedsDebt)?;
        Ok(())
    }

    fn put(&mut self, user: Address, amount: U256) {
        self.debts.insert(user, amount);
    }
}

/// The shared mutable books: every position lives here and nowhere else.
#[derive(Debug, Default)]
pub struct Books {
    pub collateral: CollateralLedger,
    pub debt: DebtLedger,
}

/// Captured state of one user's position, for all-or-nothing rollback.
#[derive(Debug, Clone)]
pub struct PositionSnapshot {
    user: Address,
    collateral: Vec<(Address, U256)>,
    debt: U256,
}

impl Books {
    /// Capture `user`'s entries across the registered `assets`.
    pub fn snapshot(&self, assets: &[Address], user: Address) -> PositionSnapshot {
        PositionSnapshot {
            user,
            collateral: assets
                .iter()
                .map(|&asset| (asset, self.collateral.balance(user, asset)))
                .collect(),
            debt: self.debt.debt_of(user),
        }
    }

    /// Reinstate a previously captured position exactly.
    pub fn restore(&mut self, snapshot: PositionSnapshot) {
        for (asset, amount) in snapshot.collateral {
            self.collateral.put(snapshot.user, asset, amount);
        }
        self.debt.put(snapshot.user, snapshot.debt);
    }
}
