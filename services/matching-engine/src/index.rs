//! Per-user index of open orders.
//!
//! Orders live by value inside book levels; this index only stores locators
//! (`symbol`, `side`, `price`) keyed by user and order id, so there is a
//! single owner for every order and no aliasing between the book and the
//! user view. Snapshots are rebuilt from the books on demand.

use exchange_types::ids::OrderId;
use exchange_types::order::{Order, Side};
use exchange_types::symbol::Symbol;
use std::collections::HashMap;

use crate::book::OrderBook;

/// Where to find an open order inside the books.
#[derive(Debug, Clone)]
pub(crate) struct OpenOrderRef {
    pub symbol: Symbol,
    pub side: Side,
    pub price: i64,
}

pub(crate) type OpenOrderIndex = HashMap<String, HashMap<OrderId, OpenOrderRef>>;

pub(crate) fn track(index: &mut OpenOrderIndex, order: &Order) {
    index.entry(order.user_id.clone()).or_default().insert(
        order.order_id,
        OpenOrderRef {
            symbol: order.symbol.clone(),
            side: order.side,
            price: order.price,
        },
    );
}

pub(crate) fn remove(index: &mut OpenOrderIndex, user_id: &str, order_id: OrderId) {
    if let Some(by_user) = index.get_mut(user_id) {
        by_user.remove(&order_id);
        if by_user.is_empty() {
            index.remove(user_id);
        }
    }
}

/// Copy of the user's open orders, sorted by creation time (ordinal as the
/// tiebreaker for equal timestamps).
pub(crate) fn snapshot(
    books: &HashMap<String, OrderBook>,
    index: &OpenOrderIndex,
    user_id: &str,
) -> Vec<Order> {
    let Some(refs) = index.get(user_id) else {
        return Vec::new();
    };

    let mut orders: Vec<Order> = refs
        .iter()
        .filter_map(|(order_id, loc)| {
            books
                .get(loc.symbol.as_str())
                .and_then(|book| book.find(loc.side, loc.price, *order_id))
                .cloned()
        })
        .collect();
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.seq.cmp(&b.seq)));
    orders
}
