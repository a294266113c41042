//! Bid (buy-side) order book.
//!
//! Buy orders keyed by price in a `BTreeMap`; the best bid is the highest
//! price, read via `next_back()`. Within a level, FIFO order gives time
//! priority. `BTreeMap` keeps iteration deterministic.

use exchange_types::execution::BookLevel;
use exchange_types::ids::OrderId;
use exchange_types::order::Order;
use std::collections::BTreeMap;

use super::price_level::PriceLevel;

#[derive(Debug, Clone, Default)]
pub struct BidBook {
    levels: BTreeMap<i64, PriceLevel>,
}

impl BidBook {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, order: Order) {
        self.levels
            .entry(order.price)
            .or_insert_with(PriceLevel::new)
            .push_back(order);
    }

    /// Remove an order, returning it if present. Empty levels are dropped to
    /// keep the book clean.
    pub fn remove(&mut self, price: i64, order_id: OrderId) -> Option<Order> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(removed)
    }

    pub fn find(&self, price: i64, order_id: OrderId) -> Option<&Order> {
        self.levels.get(&price)?.find(order_id)
    }

    /// The order first in line at the best (highest) bid price.
    pub fn best_mut(&mut self) -> Option<&mut Order> {
        self.levels
            .iter_mut()
            .next_back()
            .and_then(|(_, level)| level.front_mut())
    }

    pub fn best_price(&self) -> Option<i64> {
        self.levels.keys().next_back().copied()
    }

    /// Pop the front order of the best level, dropping the level when it
    /// empties.
    pub fn pop_best(&mut self) -> Option<Order> {
        let (&price, level) = self.levels.iter_mut().next_back()?;
        let popped = level.pop_front();
        if level.is_empty() {
            self.levels.remove(&price);
        }
        popped
    }

    /// Orders in matching priority: price descending, FIFO within a level.
    pub fn iter_orders(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().rev().flat_map(|level| level.iter())
    }

    /// Coalesce the top `depth` price levels into aggregated rows, skipping
    /// consumed orders.
    pub fn aggregate(&self, depth: usize) -> Vec<BookLevel> {
        let mut out = Vec::with_capacity(depth.min(self.levels.len()));
        for (&price, level) in self.levels.iter().rev() {
            if out.len() == depth {
                break;
            }
            let orders = level.open_orders();
            if orders == 0 {
                continue;
            }
            out.push(BookLevel {
                price,
                qty: level.open_qty(),
                orders,
            });
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use exchange_types::order::{OrderType, Side};
    use exchange_types::symbol::Symbol;

    fn bid(ordinal: u64, price: i64, qty: i64) -> Order {
        Order {
            order_id: OrderId::new(ordinal),
            client_order_id: String::new(),
            user_id: "u1".to_string(),
            symbol: Symbol::parse("BTC-USD").unwrap(),
            side: Side::BUY,
            order_type: OrderType::LIMIT,
            price,
            qty,
            remaining_qty: qty,
            created_at: Utc::now(),
            seq: ordinal,
            reserved_base_qty: 0,
            reserved_quote_qty: 0,
        }
    }

    #[test]
    fn test_best_is_highest_price() {
        let mut book = BidBook::new();
        book.insert(bid(1, 100, 1));
        book.insert(bid(2, 102, 2));
        book.insert(bid(3, 99, 3));

        assert_eq!(book.best_price(), Some(102));
        assert_eq!(book.best_mut().unwrap().order_id, OrderId::new(2));
    }

    #[test]
    fn test_time_priority_within_level() {
        let mut book = BidBook::new();
        book.insert(bid(1, 100, 1));
        book.insert(bid(2, 100, 2));

        assert_eq!(book.level_count(), 1);
        assert_eq!(book.best_mut().unwrap().order_id, OrderId::new(1));
    }

    #[test]
    fn test_remove_drops_empty_level() {
        let mut book = BidBook::new();
        book.insert(bid(1, 100, 1));

        let removed = book.remove(100, OrderId::new(1)).unwrap();
        assert_eq!(removed.order_id, OrderId::new(1));
        assert!(book.is_empty());
        assert!(book.remove(100, OrderId::new(1)).is_none());
    }

    #[test]
    fn test_pop_best_consumes_fifo() {
        let mut book = BidBook::new();
        book.insert(bid(1, 100, 1));
        book.insert(bid(2, 100, 2));
        book.insert(bid(3, 101, 3));

        assert_eq!(book.pop_best().unwrap().order_id, OrderId::new(3));
        assert_eq!(book.pop_best().unwrap().order_id, OrderId::new(1));
        assert_eq!(book.pop_best().unwrap().order_id, OrderId::new(2));
        assert!(book.pop_best().is_none());
    }

    #[test]
    fn test_aggregate_depth_and_counts() {
        let mut book = BidBook::new();
        book.insert(bid(1, 100, 2));
        book.insert(bid(2, 100, 3));
        book.insert(bid(3, 99, 7));

        let levels = book.aggregate(1);
        assert_eq!(
            levels,
            vec![BookLevel {
                price: 100,
                qty: 5,
                orders: 2
            }]
        );

        let levels = book.aggregate(10);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].price, 99);
    }

    #[test]
    fn test_iter_orders_priority() {
        let mut book = BidBook::new();
        book.insert(bid(1, 99, 1));
        book.insert(bid(2, 101, 1));
        book.insert(bid(3, 101, 1));

        let ids: Vec<u64> = book.iter_orders().map(|o| o.order_id.as_u64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
