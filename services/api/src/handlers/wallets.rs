//! Wallet reads and administrative funding.

use crate::error::ApiError;
use crate::state::{blocking, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use exchange_types::wallet::Wallet;
use serde::Deserialize;

pub async fn get_wallet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Wallet>, ApiError> {
    let engine = state.engine.clone();
    let wallet = blocking(move || engine.wallet(&user_id)).await?;
    Ok(Json(wallet))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundWalletRequest {
    user_id: String,
    asset: String,
    amount: i64,
}

pub async fn fund_wallet(
    State(state): State<AppState>,
    Json(req): Json<FundWalletRequest>,
) -> Result<Json<Wallet>, ApiError> {
    let user_id = req.user_id.trim().to_string();
    let asset = req.asset.trim().to_string();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("userId is required".to_string()));
    }
    if asset.is_empty() {
        return Err(ApiError::BadRequest("asset is required".to_string()));
    }
    if req.amount <= 0 {
        return Err(ApiError::BadRequest("amount must be positive".to_string()));
    }

    let engine = state.engine.clone();
    let wallet = blocking(move || {
        engine.fund_wallet(&user_id, &asset, req.amount);
        engine.wallet(&user_id)
    })
    .await?;
    Ok(Json(wallet))
}
