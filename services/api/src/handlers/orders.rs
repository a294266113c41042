//! Order placement, cancellation, and open-order listing.

use crate::error::ApiError;
use crate::state::{blocking, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use exchange_types::order::{Order, OrderAck, PlaceOrderRequest};
use serde::Deserialize;

pub async fn place_order(
    State(state): State<AppState>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderAck>), ApiError> {
    let engine = state.engine.clone();
    let ack = blocking(move || engine.place_order(req)).await??;
    Ok((StatusCode::CREATED, Json(ack)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderQuery {
    #[serde(default)]
    user_id: Option<String>,
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Query(query): Query<CancelOrderQuery>,
) -> Result<Json<OrderAck>, ApiError> {
    let user_id = query
        .user_id
        .filter(|user_id| !user_id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("userId query is required".to_string()))?;

    let engine = state.engine.clone();
    let ack = blocking(move || engine.cancel_order(&user_id, &order_id)).await??;
    Ok(Json(ack))
}

pub async fn open_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let engine = state.engine.clone();
    let orders = blocking(move || engine.open_orders(&user_id)).await?;
    Ok(Json(orders))
}
