//! External token capability traits.
//!
//! The engine never holds token balances itself; it instructs these
//! collaborators and treats a `false` return as an explicit failure (the
//! enclosing operation aborts and restores the books). Implementations must
//! not panic to signal failure.

use alloy::primitives::{Address, U256};

/// Transfer surface over the registered collateral assets, dispatching on
/// asset id.
pub trait CollateralTokens: Send + Sync {
    /// Move `amount` of `asset` out of the engine's pooled custody to `to`.
    fn transfer(&self, asset: Address, to: Address, amount: U256) -> bool;

    /// Move `amount` of `asset` from `from` to `to` on the engine's behalf.
    fn transfer_from(&self, asset: Address, from: Address, to: Address, amount: U256) -> bool;
}

/// The synthetic asset's ledger. The engine is its sole authorized issuer
/// but does not duplicate its balance state.
pub trait SyntheticIssuer: Send + Sync {
    /// Create `amount` of the synthetic for `to`.
    fn mint(&self, to: Address, amount: U256) -> bool;

    /// Destroy `amount` held by the engine's custody account.
    fn burn(&self, amount: U256);

    /// Move `amount` of the synthetic from `from` to `to` on the engine's
    /// behalf.
    fn transfer_from(&self, from: Address, to: Address, amount: U256) -> bool;
}
