//! Core accounting and risk engine for the synthd protocol.
//!
//! Users deposit approved collateral, mint the dollar-pegged synthetic
//! against it, and must keep their position's health factor at or above the
//! minimum after every mutation; anyone may liquidate a position that falls
//! below it, for a collateral bonus.
//!
//! Every public operation is a single atomic unit over the shared books:
//! validate inputs, snapshot the affected position, mutate the ledgers, run
//! the solvency checks, and only then invoke external token capabilities.
//! Any failure restores the snapshot, so callers never observe a
//! partially-updated position.

pub mod health;
pub mod ledger;
pub mod tokens;

mod engine;
mod liquidation;
mod position;

pub use engine::Engine;
