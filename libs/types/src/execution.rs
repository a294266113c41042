//! Trade execution and book snapshot types.

use crate::ids::{OrderId, TradeId};
use crate::symbol::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One maker-taker match. Immutable once recorded; appended per symbol in
/// match order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub price: i64,
    pub qty: i64,
    pub maker_order_id: OrderId,
    pub maker_user_id: String,
    pub taker_order_id: OrderId,
    pub taker_user_id: String,
    pub ts: DateTime<Utc>,
}

/// Aggregated depth row: total open quantity and order count at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: i64,
    pub qty: i64,
    pub orders: usize,
}

/// Depth-limited view of one symbol's book at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookSnapshot {
    pub symbol: String,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub ts: DateTime<Utc>,
}
