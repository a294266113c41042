//! Market data: trade listings and book snapshots.

use crate::error::ApiError;
use crate::state::{blocking, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use exchange_types::execution::{Execution, OrderBookSnapshot};
use serde::Deserialize;

const DEFAULT_TRADES_LIMIT: usize = 100;
const DEFAULT_BOOK_DEPTH: usize = 20;

#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    #[serde(default)]
    limit: Option<i64>,
}

pub async fn list_trades(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<Vec<Execution>>, ApiError> {
    let limit = match query.limit {
        Some(limit) if limit <= 0 => {
            return Err(ApiError::BadRequest(
                "limit must be a positive integer".to_string(),
            ))
        }
        Some(limit) => limit as usize,
        None => DEFAULT_TRADES_LIMIT,
    };

    let trade_source = state.trade_source.clone();
    let trades = blocking(move || trade_source.list_executions(&symbol, limit)).await??;
    Ok(Json(trades))
}

#[derive(Debug, Deserialize)]
pub struct BookQuery {
    #[serde(default)]
    depth: Option<i64>,
}

pub async fn book_snapshot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<BookQuery>,
) -> Result<Json<OrderBookSnapshot>, ApiError> {
    let depth = match query.depth {
        Some(depth) if depth <= 0 => {
            return Err(ApiError::BadRequest(
                "depth must be a positive integer".to_string(),
            ))
        }
        Some(depth) => depth as usize,
        None => DEFAULT_BOOK_DEPTH,
    };

    let engine = state.engine.clone();
    let snapshot = blocking(move || engine.order_book_snapshot(&symbol, depth)).await?;
    Ok(Json(snapshot))
}
