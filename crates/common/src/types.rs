use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted by the engine when an operation commits.
///
/// A failed operation emits nothing: events are staged during execution and
/// published only after every mutation, solvency check, and external call has
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    CollateralDeposited {
        user: Address,
        asset: Address,
        amount: U256,
        at: DateTime<Utc>,
    },
    CollateralRedeemed {
        from: Address,
        to: Address,
        asset: Address,
        amount: U256,
        at: DateTime<Utc>,
    },
    SyntheticMinted {
        user: Address,
        amount: U256,
        at: DateTime<Utc>,
    },
    SyntheticBurned {
        /// Account whose debt was reduced.
        on_behalf_of: Address,
        /// Account that funded the burn.
        paid_by: Address,
        amount: U256,
        at: DateTime<Utc>,
    },
    PositionLiquidated {
        user: Address,
        liquidator: Address,
        asset: Address,
        debt_covered: U256,
        collateral_seized: U256,
        at: DateTime<Utc>,
    },
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineEvent::CollateralDeposited { .. } => write!(f, "collateral_deposited"),
            EngineEvent::CollateralRedeemed { .. } => write!(f, "collateral_redeemed"),
            EngineEvent::SyntheticMinted { .. } => write!(f, "synthetic_minted"),
            EngineEvent::SyntheticBurned { .. } => write!(f, "synthetic_burned"),
            EngineEvent::PositionLiquidated { .. } => write!(f, "position_liquidated"),
        }
    }
}

/// Read-model for a user's position, as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub user: Address,
    /// Outstanding synthetic debt, 18 decimals.
    pub debt: U256,
    /// Aggregate collateral valuation, 18-decimal USD.
    pub collateral_value_usd: U256,
    /// 18-decimal ratio; `U256::MAX` means no debt.
    pub health_factor: U256,
}
