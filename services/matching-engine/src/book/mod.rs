//! Per-symbol order book: a bid side and an ask side.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;

use exchange_types::ids::OrderId;
use exchange_types::order::{Order, Side};

/// Both sides of one symbol's book. An order appears on at most one side,
/// and only while its remaining quantity is positive.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    pub bids: BidBook,
    pub asks: AskBook,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BidBook::new(),
            asks: AskBook::new(),
        }
    }

    pub fn insert(&mut self, order: Order) {
        match order.side {
            Side::BUY => self.bids.insert(order),
            Side::SELL => self.asks.insert(order),
        }
    }

    pub fn remove(&mut self, side: Side, price: i64, order_id: OrderId) -> Option<Order> {
        match side {
            Side::BUY => self.bids.remove(price, order_id),
            Side::SELL => self.asks.remove(price, order_id),
        }
    }

    pub fn find(&self, side: Side, price: i64, order_id: OrderId) -> Option<&Order> {
        match side {
            Side::BUY => self.bids.find(price, order_id),
            Side::SELL => self.asks.find(price, order_id),
        }
    }
}
