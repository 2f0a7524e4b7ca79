use alloy::primitives::{Address, I256, U256};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Protocol error taxonomy used across the application.
///
/// Every failure path is a named condition; nothing is swallowed. Operations
/// are all-or-nothing: any of these raised mid-operation means the books were
/// restored to their pre-operation state before the error was returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("collateral asset and price feed lists differ in length")]
    LengthMismatch,

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("asset {0} is not registered as collateral")]
    InvalidAsset(Address),

    #[error("price feed reported a non-positive price: {0}")]
    InvalidPrice(I256),

    #[error("not a valid account or asset address: {0}")]
    InvalidAddress(String),

    #[error("insufficient collateral balance for withdrawal")]
    InsufficientCollateral,

    #[error("burn amount exceeds outstanding debt")]
    BurnExceedsDebt,

    #[error("operation would leave health factor at {0}, below the minimum")]
    BreaksHealthFactor(U256),

    #[error("synthetic issuer rejected the mint")]
    MintFailed,

    #[error("token transfer failed")]
    TransferFailed,

    #[error("health factor {0} is above the liquidation minimum")]
    HealthFactorOk(U256),

    #[error("liquidation did not improve the target's health factor")]
    HealthFactorNotImproved,

    #[error("fixed-point arithmetic overflow")]
    MathOverflow,
}

impl IntoResponse for ProtocolError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProtocolError::LengthMismatch
            | ProtocolError::ZeroAmount
            | ProtocolError::InvalidAsset(_)
            | ProtocolError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ProtocolError::InsufficientCollateral
            | ProtocolError::BurnExceedsDebt
            | ProtocolError::BreaksHealthFactor(_)
            | ProtocolError::HealthFactorOk(_)
            | ProtocolError::HealthFactorNotImproved => StatusCode::CONFLICT,
            ProtocolError::MintFailed | ProtocolError::TransferFailed => StatusCode::BAD_GATEWAY,
            ProtocolError::InvalidPrice(_) | ProtocolError::MathOverflow => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
