//! Order lifecycle types.
//!
//! All prices and quantities are integers in minor units; a LIMIT order
//! carries a positive price, a MARKET order carries price 0.

use crate::ids::OrderId;
use crate::symbol::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    BUY,
    SELL,
}

impl Side {
    /// The side a taker matches against.
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// Supported order types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    LIMIT,
    MARKET,
}

/// Order status reported in acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Resting on the book with no fills yet.
    Accepted,
    /// Some quantity filled, some remaining.
    PartiallyFilled,
    /// Completely filled (terminal).
    Filled,
    /// Canceled by the user (terminal).
    Canceled,
    /// Failed validation (terminal).
    Rejected,
}

/// Inbound order placement request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub client_order_id: String,
    pub user_id: String,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: i64,
    pub qty: i64,
}

/// An order as tracked by the engine.
///
/// The serde-skipped fields are engine bookkeeping: the time-priority
/// ordinal and the balance holds currently attached to this order. They
/// never cross the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub client_order_id: String,
    pub user_id: String,
    pub symbol: Symbol,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: i64,
    pub qty: i64,
    pub remaining_qty: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub seq: u64,
    #[serde(skip)]
    pub reserved_base_qty: i64,
    #[serde(skip)]
    pub reserved_quote_qty: i64,
}

impl Order {
    pub fn filled_qty(&self) -> i64 {
        self.qty - self.remaining_qty
    }
}

/// Acknowledgement returned from place and cancel operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub filled_qty: i64,
    pub remaining_qty: i64,
    pub avg_price: i64,
    pub client_order_id: String,
    pub symbol: Symbol,
    pub ts: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            order_id: OrderId::new(7),
            client_order_id: "c-7".to_string(),
            user_id: "u1".to_string(),
            symbol: Symbol::parse("BTC-USD").unwrap(),
            side: Side::BUY,
            order_type: OrderType::LIMIT,
            price: 100,
            qty: 10,
            remaining_qty: 4,
            created_at: Utc::now(),
            seq: 7,
            reserved_base_qty: 0,
            reserved_quote_qty: 400,
        }
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap(),
            "\"PARTIALLY_FILLED\""
        );
        assert_eq!(serde_json::to_string(&OrderStatus::Accepted).unwrap(), "\"ACCEPTED\"");
    }

    #[test]
    fn test_order_filled_qty() {
        assert_eq!(sample_order().filled_qty(), 6);
    }

    #[test]
    fn test_order_serialization_hides_internal_fields() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();

        assert!(json.contains("\"orderId\":\"ord-7\""));
        assert!(json.contains("\"type\":\"LIMIT\""));
        assert!(json.contains("\"remainingQty\":4"));
        assert!(!json.contains("reserved"));
        assert!(!json.contains("seq"));

        let decoded: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.order_id, order.order_id);
        assert_eq!(decoded.remaining_qty, order.remaining_qty);
        // Internal counters reset to defaults on the way back in.
        assert_eq!(decoded.reserved_quote_qty, 0);
        assert_eq!(decoded.seq, 0);
    }

    #[test]
    fn test_place_order_request_defaults() {
        let req: PlaceOrderRequest = serde_json::from_str(
            r#"{"userId":"u1","symbol":"BTC-USD","side":"BUY","type":"MARKET","qty":3}"#,
        )
        .unwrap();
        assert_eq!(req.price, 0);
        assert_eq!(req.client_order_id, "");
        assert_eq!(req.order_type, OrderType::MARKET);
    }
}
