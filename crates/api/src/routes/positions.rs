//! Read-only position and protocol views.

use alloy::primitives::Address;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use synthd_common::error::ProtocolError;
use synthd_common::types::AccountSummary;
use synthd_engine::health::{
    LIQUIDATION_BONUS, LIQUIDATION_PRECISION, LIQUIDATION_THRESHOLD, MIN_HEALTH_FACTOR,
};
use synthd_oracle::{FEED_DECIMALS, PRECISION};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/assets", get(list_assets))
        .route("/api/config", get(protocol_config))
        .route("/api/positions/{user}", get(position_summary))
        .route(
            "/api/positions/{user}/collateral/{asset}",
            get(collateral_balance),
        )
}

fn parse_address(raw: &str) -> Result<Address, ProtocolError> {
    raw.parse()
        .map_err(|_| ProtocolError::InvalidAddress(raw.to_string()))
}

/// GET /api/assets — the registered collateral roster with current prices.
async fn list_assets(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    let mut assets = Vec::new();
    for spec in &state.config.collateral {
        let price = state
            .engine
            .price_feed(spec.asset)
            .map(|feed| feed.latest_price().to_string());
        assets.push(json!({
            "symbol": spec.symbol,
            "asset": spec.asset,
            "raw_price": price,
        }));
    }
    Ok(Json(json!({ "assets": assets })))
}

/// GET /api/config — the protocol's tunable constants.
async fn protocol_config() -> Json<serde_json::Value> {
    Json(json!({
        "liquidation_threshold": LIQUIDATION_THRESHOLD,
        "liquidation_precision": LIQUIDATION_PRECISION,
        "liquidation_bonus": LIQUIDATION_BONUS,
        "min_health_factor": MIN_HEALTH_FACTOR,
        "precision": PRECISION,
        "feed_decimals": FEED_DECIMALS,
    }))
}

/// GET /api/positions/:user — debt, collateral valuation, health factor.
async fn position_summary(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<AccountSummary>, ProtocolError> {
    let user = parse_address(&user)?;
    let (debt, collateral_value_usd) = state.engine.account_information(user).await?;
    let health_factor = state.engine.health_factor(user).await?;

    Ok(Json(AccountSummary {
        user,
        debt,
        collateral_value_usd,
        health_factor,
    }))
}

/// GET /api/positions/:user/collateral/:asset — one deposited balance.
async fn collateral_balance(
    State(state): State<AppState>,
    Path((user, asset)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ProtocolError> {
    let user = parse_address(&user)?;
    let asset = parse_address(&asset)?;
    let amount = state.engine.collateral_balance(user, asset).await;

    Ok(Json(json!({
        "user": user,
        "asset": asset,
        "amount": amount,
    })))
}
