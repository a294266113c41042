//! Crossing detection: can a taker trade against a resting price?

use exchange_types::order::{Order, OrderType, Side};

/// A MARKET taker crosses anything; a LIMIT taker crosses while the maker's
/// price is at least as good as its own limit.
pub fn taker_crosses(taker: &Order, maker_price: i64) -> bool {
    match taker.order_type {
        OrderType::MARKET => true,
        OrderType::LIMIT => match taker.side {
            Side::BUY => taker.price >= maker_price,
            Side::SELL => taker.price <= maker_price,
        },
    }
}
