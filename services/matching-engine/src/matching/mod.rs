//! The match loop: consume the opposite side of the book in price-time
//! priority, settling each fill as it happens.
//!
//! Trades always print at the maker's price. Self-trades are not prevented:
//! a user crossing their own resting order trades with themselves.

pub mod crossing;

use chrono::Utc;
use exchange_types::errors::EngineError;
use exchange_types::execution::Execution;
use exchange_types::ids::TradeId;
use exchange_types::order::{Order, Side};
use std::collections::BTreeSet;

use crate::book::OrderBook;
use crate::index::{self, OpenOrderIndex};
use crate::ledger::Ledger;
use crate::settle;

/// What one pass through the match loop produced.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub filled_qty: i64,
    pub avg_price: i64,
    /// Maker users whose open-order view changed (the taker is added by the
    /// caller).
    pub touched_users: BTreeSet<String>,
    /// Executions in match order, ready for the log and the sink.
    pub executions: Vec<Execution>,
}

/// Match `taker` against the book until it is filled, the book runs dry, or
/// prices stop crossing. Each fill settles immediately; fully consumed
/// makers leave the book and the open-order index.
pub(crate) fn run(
    book: &mut OrderBook,
    ledger: &mut Ledger,
    open_orders: &mut OpenOrderIndex,
    trade_seq: &mut u64,
    taker: &mut Order,
) -> Result<MatchOutcome, EngineError> {
    let mut outcome = MatchOutcome::default();
    let mut weighted_notional: i64 = 0;

    while taker.remaining_qty > 0 {
        // Maker borrow scope: fields needed after book mutation are copied
        // out before the borrow ends.
        let (trade_qty, trade_price, maker_user, maker_order_id, maker_done) = {
            let maker = match taker.side {
                Side::BUY => book.asks.best_mut(),
                Side::SELL => book.bids.best_mut(),
            };
            let Some(maker) = maker else {
                break;
            };
            if !crossing::taker_crosses(taker, maker.price) {
                break;
            }

            let trade_qty = taker.remaining_qty.min(maker.remaining_qty);
            let trade_price = maker.price;

            settle::settle_trade(ledger, taker, maker, trade_qty, trade_price)?;

            taker.remaining_qty -= trade_qty;
            maker.remaining_qty -= trade_qty;

            (
                trade_qty,
                trade_price,
                maker.user_id.clone(),
                maker.order_id,
                maker.remaining_qty == 0,
            )
        };

        outcome.filled_qty += trade_qty;
        weighted_notional += trade_qty * trade_price;
        outcome.touched_users.insert(maker_user.clone());

        *trade_seq += 1;
        outcome.executions.push(Execution {
            trade_id: TradeId::new(*trade_seq),
            symbol: taker.symbol.clone(),
            price: trade_price,
            qty: trade_qty,
            maker_order_id,
            maker_user_id: maker_user.clone(),
            taker_order_id: taker.order_id,
            taker_user_id: taker.user_id.clone(),
            ts: Utc::now(),
        });

        if maker_done {
            match taker.side {
                Side::BUY => book.asks.pop_best(),
                Side::SELL => book.bids.pop_best(),
            };
            index::remove(open_orders, &maker_user, maker_order_id);
        }
    }

    if outcome.filled_qty > 0 {
        outcome.avg_price = weighted_notional / outcome.filled_qty;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use exchange_types::ids::OrderId;
    use exchange_types::order::OrderType;
    use exchange_types::symbol::Symbol;

    fn order(
        ordinal: u64,
        user: &str,
        side: Side,
        order_type: OrderType,
        price: i64,
        qty: i64,
    ) -> Order {
        Order {
            order_id: OrderId::new(ordinal),
            client_order_id: String::new(),
            user_id: user.to_string(),
            symbol: Symbol::parse("BTC-USD").unwrap(),
            side,
            order_type,
            price,
            qty,
            remaining_qty: qty,
            created_at: Utc::now(),
            seq: ordinal,
            reserved_base_qty: 0,
            reserved_quote_qty: 0,
        }
    }

    fn rest_sell(
        book: &mut OrderBook,
        ledger: &mut Ledger,
        open_orders: &mut OpenOrderIndex,
        ordinal: u64,
        user: &str,
        price: i64,
        qty: i64,
    ) {
        ledger.fund(user, "BTC", qty);
        let mut maker = order(ordinal, user, Side::SELL, OrderType::LIMIT, price, qty);
        let wallet = ledger.ensure(user);
        wallet.debit_available("BTC", qty).unwrap();
        wallet.credit_reserved("BTC", qty);
        maker.reserved_base_qty = qty;
        index::track(open_orders, &maker);
        book.insert(maker);
    }

    #[test]
    fn test_sweeps_makers_in_time_order() {
        let mut book = OrderBook::new();
        let mut ledger = Ledger::new();
        let mut open_orders = OpenOrderIndex::new();
        let mut trade_seq = 0;

        rest_sell(&mut book, &mut ledger, &mut open_orders, 1, "s1", 100, 5);
        rest_sell(&mut book, &mut ledger, &mut open_orders, 2, "s2", 100, 5);

        let mut taker = order(3, "buyer", Side::BUY, OrderType::MARKET, 0, 7);
        let outcome = run(
            &mut book,
            &mut ledger,
            &mut open_orders,
            &mut trade_seq,
            &mut taker,
        )
        .unwrap();

        assert_eq!(outcome.filled_qty, 7);
        assert_eq!(outcome.avg_price, 100);
        assert_eq!(outcome.executions.len(), 2);
        assert_eq!(outcome.executions[0].maker_user_id, "s1");
        assert_eq!(outcome.executions[0].qty, 5);
        assert_eq!(outcome.executions[0].trade_id, TradeId::new(1));
        assert_eq!(outcome.executions[1].maker_user_id, "s2");
        assert_eq!(outcome.executions[1].qty, 2);

        // s1 fully consumed: gone from book and index; s2 partially left.
        assert!(!open_orders.contains_key("s1"));
        assert!(open_orders.contains_key("s2"));
        assert_eq!(book.asks.best_mut().unwrap().remaining_qty, 3);
    }

    #[test]
    fn test_limit_taker_stops_at_its_price() {
        let mut book = OrderBook::new();
        let mut ledger = Ledger::new();
        let mut open_orders = OpenOrderIndex::new();
        let mut trade_seq = 0;

        rest_sell(&mut book, &mut ledger, &mut open_orders, 1, "s1", 100, 1);
        rest_sell(&mut book, &mut ledger, &mut open_orders, 2, "s2", 105, 1);

        let mut taker = order(3, "buyer", Side::BUY, OrderType::LIMIT, 100, 5);
        let wallet = ledger.ensure("buyer");
        wallet.debit_available("USD", 500).unwrap();
        wallet.credit_reserved("USD", 500);
        taker.reserved_quote_qty = 500;

        let outcome = run(
            &mut book,
            &mut ledger,
            &mut open_orders,
            &mut trade_seq,
            &mut taker,
        )
        .unwrap();

        assert_eq!(outcome.filled_qty, 1);
        assert_eq!(taker.remaining_qty, 4);
        assert_eq!(book.asks.best_price(), Some(105));
    }

    #[test]
    fn test_no_makers_means_no_fills() {
        let mut book = OrderBook::new();
        let mut ledger = Ledger::new();
        let mut open_orders = OpenOrderIndex::new();
        let mut trade_seq = 0;

        let mut taker = order(1, "buyer", Side::BUY, OrderType::MARKET, 0, 5);
        let outcome = run(
            &mut book,
            &mut ledger,
            &mut open_orders,
            &mut trade_seq,
            &mut taker,
        )
        .unwrap();

        assert_eq!(outcome.filled_qty, 0);
        assert_eq!(outcome.avg_price, 0);
        assert!(outcome.executions.is_empty());
        assert_eq!(trade_seq, 0);
    }
}
