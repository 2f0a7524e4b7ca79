//! Sandbox faucet.

use alloy::primitives::{Address, U256};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use synthd_common::error::ProtocolError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sandbox/fund", post(fund))
}

#[derive(Debug, Deserialize)]
struct FundRequest {
    asset: Address,
    holder: Address,
    amount: U256,
}

/// POST /api/sandbox/fund — credit an account with collateral to play with.
///
/// Only registered collateral assets can be conjured; the synthetic is
/// obtainable solely by minting against a position.
async fn fund(
    State(state): State<AppState>,
    Json(req): Json<FundRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    if state.engine.price_feed(req.asset).is_none() {
        return Err(ProtocolError::InvalidAsset(req.asset));
    }

    state.bank.fund(req.asset, req.holder, req.amount);
    Ok(Json(json!({
        "status": "funded",
        "holder": req.holder,
        "asset": req.asset,
        "balance": state.bank.balance_of(req.asset, req.holder),
    })))
}
