//! Reservation manager: balance holds backing open orders.
//!
//! Placing an order moves the committed amount from `available` to
//! `reserved` and records the hold on the order itself. A SELL holds the
//! full base quantity; a LIMIT BUY holds `price * qty` of quote; a MARKET
//! BUY holds the estimated sweep cost of the current ask side, which may be
//! less than the full quantity's worth when the book is shallow. Failure
//! leaves the wallet untouched.

use exchange_types::errors::EngineError;
use exchange_types::order::{Order, OrderType, Side};

use crate::book::OrderBook;
use crate::ledger::Ledger;

/// Apply the placement-time hold for `order`.
pub fn reserve(ledger: &mut Ledger, book: &OrderBook, order: &mut Order) -> Result<(), EngineError> {
    let base = order.symbol.base().to_string();
    let quote = order.symbol.quote().to_string();
    let wallet = ledger.ensure(&order.user_id);

    match (order.side, order.order_type) {
        (Side::SELL, _) => {
            wallet.debit_available(&base, order.qty)?;
            wallet.credit_reserved(&base, order.qty);
            order.reserved_base_qty = order.qty;
        }
        (Side::BUY, OrderType::LIMIT) => {
            let required = order.price * order.qty;
            wallet.debit_available(&quote, required)?;
            wallet.credit_reserved(&quote, required);
            order.reserved_quote_qty = required;
        }
        (Side::BUY, OrderType::MARKET) => {
            let required = estimate_market_buy_notional(book, order.qty);
            if required == 0 {
                return Ok(());
            }
            wallet.debit_available(&quote, required)?;
            wallet.credit_reserved(&quote, required);
            order.reserved_quote_qty = required;
        }
    }
    Ok(())
}

/// Cost of sweeping the ask side for up to `qty` units at current prices.
/// Undershoots when the book holds less than `qty`.
pub fn estimate_market_buy_notional(book: &OrderBook, qty: i64) -> i64 {
    let mut remaining = qty;
    let mut notional = 0;
    for ask in book.asks.iter_orders() {
        if remaining <= 0 {
            break;
        }
        let take = remaining.min(ask.remaining_qty);
        notional += take * ask.price;
        remaining -= take;
    }
    notional
}

/// Return the order's outstanding holds to `available` and zero the
/// per-order counters. Capped at what the wallet actually holds in
/// `reserved`, so it is safe after partial consumption by settlement.
pub fn release(ledger: &mut Ledger, order: &mut Order) {
    let base = order.symbol.base().to_string();
    let quote = order.symbol.quote().to_string();
    let wallet = ledger.ensure(&order.user_id);

    if order.reserved_quote_qty > 0 {
        wallet.release_reserved(&quote, order.reserved_quote_qty);
        order.reserved_quote_qty = 0;
    }
    if order.reserved_base_qty > 0 {
        wallet.release_reserved(&base, order.reserved_base_qty);
        order.reserved_base_qty = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use exchange_types::ids::OrderId;
    use exchange_types::symbol::Symbol;

    fn order(side: Side, order_type: OrderType, price: i64, qty: i64) -> Order {
        Order {
            order_id: OrderId::new(1),
            client_order_id: String::new(),
            user_id: "u1".to_string(),
            symbol: Symbol::parse("BTC-USD").unwrap(),
            side,
            order_type,
            price,
            qty,
            remaining_qty: qty,
            created_at: Utc::now(),
            seq: 1,
            reserved_base_qty: 0,
            reserved_quote_qty: 0,
        }
    }

    fn resting_ask(ordinal: u64, price: i64, qty: i64) -> Order {
        let mut ask = order(Side::SELL, OrderType::LIMIT, price, qty);
        ask.order_id = OrderId::new(ordinal);
        ask.seq = ordinal;
        ask
    }

    #[test]
    fn test_reserve_limit_buy_holds_notional() {
        let mut ledger = Ledger::new();
        let book = OrderBook::new();
        let mut buy = order(Side::BUY, OrderType::LIMIT, 100, 5);

        reserve(&mut ledger, &book, &mut buy).unwrap();

        let wallet = ledger.ensure("u1");
        assert_eq!(wallet.available_balance("USD"), 99_500);
        assert_eq!(wallet.reserved_balance("USD"), 500);
        assert_eq!(buy.reserved_quote_qty, 500);
    }

    #[test]
    fn test_reserve_sell_holds_base() {
        let mut ledger = Ledger::new();
        ledger.fund("u1", "BTC", 5);
        let book = OrderBook::new();
        let mut sell = order(Side::SELL, OrderType::LIMIT, 100, 5);

        reserve(&mut ledger, &book, &mut sell).unwrap();

        let wallet = ledger.ensure("u1");
        assert_eq!(wallet.available_balance("BTC"), 0);
        assert_eq!(wallet.reserved_balance("BTC"), 5);
        assert_eq!(sell.reserved_base_qty, 5);
    }

    #[test]
    fn test_reserve_fails_without_funds() {
        let mut ledger = Ledger::new();
        let book = OrderBook::new();
        let mut sell = order(Side::SELL, OrderType::LIMIT, 100, 5);

        let err = reserve(&mut ledger, &book, &mut sell).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds { .. }));
        assert_eq!(sell.reserved_base_qty, 0);
        assert_eq!(ledger.ensure("u1").reserved_balance("BTC"), 0);
    }

    #[test]
    fn test_market_buy_estimate_walks_asks() {
        let mut book = OrderBook::new();
        book.insert(resting_ask(1, 100, 5));
        book.insert(resting_ask(2, 110, 5));

        assert_eq!(estimate_market_buy_notional(&book, 7), 5 * 100 + 2 * 110);
        // Shallow book: estimate covers only what is there.
        assert_eq!(estimate_market_buy_notional(&book, 50), 5 * 100 + 5 * 110);
        assert_eq!(estimate_market_buy_notional(&OrderBook::new(), 5), 0);
    }

    #[test]
    fn test_market_buy_empty_book_reserves_nothing() {
        let mut ledger = Ledger::new();
        let book = OrderBook::new();
        let mut buy = order(Side::BUY, OrderType::MARKET, 0, 5);

        reserve(&mut ledger, &book, &mut buy).unwrap();
        assert_eq!(buy.reserved_quote_qty, 0);
        assert_eq!(ledger.ensure("u1").reserved_balance("USD"), 0);
    }

    #[test]
    fn test_release_returns_hold_and_zeroes_counter() {
        let mut ledger = Ledger::new();
        let book = OrderBook::new();
        let mut buy = order(Side::BUY, OrderType::LIMIT, 100, 5);
        reserve(&mut ledger, &book, &mut buy).unwrap();

        release(&mut ledger, &mut buy);

        let wallet = ledger.ensure("u1");
        assert_eq!(wallet.available_balance("USD"), 100_000);
        assert_eq!(wallet.reserved_balance("USD"), 0);
        assert_eq!(buy.reserved_quote_qty, 0);
    }
}
