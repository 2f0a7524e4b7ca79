//! Position and liquidation operations.
//!
//! The sandbox has no authentication layer, so each request names its
//! caller explicitly. Every handler maps straight onto one atomic engine
//! operation; errors arrive as the protocol's named conditions.

use alloy::primitives::{Address, U256};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use synthd_common::error::ProtocolError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/positions/deposit", post(deposit))
        .route("/api/positions/mint", post(mint))
        .route("/api/positions/deposit-and-mint", post(deposit_and_mint))
        .route("/api/positions/burn", post(burn))
        .route("/api/positions/redeem", post(redeem))
        .route(
            "/api/positions/redeem-for-synthetic",
            post(redeem_for_synthetic),
        )
        .route("/api/positions/liquidate", post(liquidate))
}

#[derive(Debug, Deserialize)]
struct DepositRequest {
    caller: Address,
    asset: Address,
    amount: U256,
}

#[derive(Debug, Deserialize)]
struct MintRequest {
    caller: Address,
    amount: U256,
}

#[derive(Debug, Deserialize)]
struct DepositAndMintRequest {
    caller: Address,
    asset: Address,
    collateral_amount: U256,
    debt_amount: U256,
}

#[derive(Debug, Deserialize)]
struct BurnRequest {
    caller: Address,
    amount: U256,
}

#[derive(Debug, Deserialize)]
struct RedeemRequest {
    caller: Address,
    asset: Address,
    amount: U256,
}

#[derive(Debug, Deserialize)]
struct RedeemForSyntheticRequest {
    caller: Address,
    asset: Address,
    collateral_amount: U256,
    debt_amount: U256,
}

#[derive(Debug, Deserialize)]
struct LiquidateRequest {
    liquidator: Address,
    user: Address,
    asset: Address,
    debt_to_cover: U256,
}

/// Shared success shape: the caller's position after the operation.
async fn committed(state: &AppState, user: Address) -> Result<Json<serde_json::Value>, ProtocolError> {
    let (debt, collateral_value_usd) = state.engine.account_information(user).await?;
    let health_factor = state.engine.health_factor(user).await?;
    Ok(Json(json!({
        "status": "committed",
        "user": user,
        "debt": debt,
        "collateral_value_usd": collateral_value_usd,
        "health_factor": health_factor,
    })))
}

async fn deposit(
    State(state): State<AppState>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state
        .engine
        .deposit_collateral(req.caller, req.asset, req.amount)
        .await?;
    committed(&state, req.caller).await
}

async fn mint(
    State(state): State<AppState>,
    Json(req): Json<MintRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state.engine.mint_synthetic(req.caller, req.amount).await?;
    committed(&state, req.caller).await
}

async fn deposit_and_mint(
    State(state): State<AppState>,
    Json(req): Json<DepositAndMintRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state
        .engine
        .deposit_collateral_and_mint(req.caller, req.asset, req.collateral_amount, req.debt_amount)
        .await?;
    committed(&state, req.caller).await
}

async fn burn(
    State(state): State<AppState>,
    Json(req): Json<BurnRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state.engine.burn_synthetic(req.caller, req.amount).await?;
    committed(&state, req.caller).await
}

async fn redeem(
    State(state): State<AppState>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state
        .engine
        .redeem_collateral(req.caller, req.asset, req.amount)
        .await?;
    committed(&state, req.caller).await
}

async fn redeem_for_synthetic(
    State(state): State<AppState>,
    Json(req): Json<RedeemForSyntheticRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state
        .engine
        .redeem_collateral_for_synthetic(
            req.caller,
            req.asset,
            req.collateral_amount,
            req.debt_amount,
        )
        .await?;
    committed(&state, req.caller).await
}

async fn liquidate(
    State(state): State<AppState>,
    Json(req): Json<LiquidateRequest>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    state
        .engine
        .liquidate(req.liquidator, req.user, req.asset, req.debt_to_cover)
        .await?;
    committed(&state, req.user).await
}
