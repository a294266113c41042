//! The matching engine facade.
//!
//! One mutex guards all engine state: books, wallets, execution logs, the
//! open-order index, and both monotonic sequences. Every mutating operation
//! runs entirely inside the lock; outbound adapter calls happen only after
//! the guard is dropped, so nothing inside the critical section can block on
//! I/O. Adapter failures are logged and swallowed: the in-memory model is
//! authoritative, external stores are an eventually-consistent shadow.

use chrono::Utc;
use exchange_types::errors::EngineError;
use exchange_types::execution::{Execution, OrderBookSnapshot};
use exchange_types::ids::OrderId;
use exchange_types::order::{Order, OrderAck, OrderStatus, OrderType, PlaceOrderRequest};
use exchange_types::symbol::Symbol;
use exchange_types::wallet::Wallet;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::adapters::{ExecutionSink, OpenOrdersStore};
use crate::book::OrderBook;
use crate::index::{self, OpenOrderIndex};
use crate::ledger::Ledger;
use crate::matching::{self, MatchOutcome};
use crate::reserve;

pub const DEFAULT_BOOK_DEPTH: usize = 20;

#[derive(Default)]
struct EngineState {
    books: HashMap<String, OrderBook>,
    ledger: Ledger,
    open_orders: OpenOrderIndex,
    executions: HashMap<String, Vec<Execution>>,
    order_seq: u64,
    trade_seq: u64,
}

pub struct Engine {
    state: Mutex<EngineState>,
    open_orders_store: Option<Arc<dyn OpenOrdersStore>>,
    execution_sink: Option<Arc<dyn ExecutionSink>>,
}

impl Engine {
    /// Purely in-memory engine with no outbound adapters.
    pub fn new() -> Self {
        Self::with_adapters(None, None)
    }

    pub fn with_adapters(
        open_orders_store: Option<Arc<dyn OpenOrdersStore>>,
        execution_sink: Option<Arc<dyn ExecutionSink>>,
    ) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            open_orders_store,
            execution_sink,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        // Poisoning is unreachable: no code path panics while holding the lock.
        self.state.lock().expect("engine mutex poisoned")
    }

    /// Validate, reserve, match, settle, and rest or discard the residual.
    ///
    /// Executions and open-order snapshots for every touched user are
    /// published to the adapters after the lock is released, in match order
    /// per symbol.
    pub fn place_order(&self, req: PlaceOrderRequest) -> Result<OrderAck, EngineError> {
        let mut state = self.lock_state();

        let symbol = validate(&req)?;

        state.order_seq += 1;
        let seq = state.order_seq;
        let mut order = Order {
            order_id: OrderId::new(seq),
            client_order_id: req.client_order_id,
            user_id: req.user_id,
            symbol: symbol.clone(),
            side: req.side,
            order_type: req.order_type,
            price: match req.order_type {
                OrderType::LIMIT => req.price,
                OrderType::MARKET => 0,
            },
            qty: req.qty,
            remaining_qty: req.qty,
            created_at: Utc::now(),
            seq,
            reserved_base_qty: 0,
            reserved_quote_qty: 0,
        };

        let EngineState {
            books,
            ledger,
            open_orders,
            executions,
            trade_seq,
            ..
        } = &mut *state;
        let book = books.entry(symbol.as_str().to_string()).or_default();

        reserve::reserve(ledger, book, &mut order)?;

        let outcome = match matching::run(book, ledger, open_orders, trade_seq, &mut order) {
            Ok(outcome) => outcome,
            Err(err) => {
                reserve::release(ledger, &mut order);
                return Err(err);
            }
        };

        if order.order_type == OrderType::LIMIT && order.remaining_qty > 0 {
            index::track(open_orders, &order);
            book.insert(order.clone());
        }

        if order.order_type == OrderType::MARKET && outcome.filled_qty == 0 {
            reserve::release(ledger, &mut order);
            return Err(EngineError::NoLiquidity);
        }

        if order.order_type == OrderType::MARKET || order.remaining_qty == 0 {
            reserve::release(ledger, &mut order);
        }

        let MatchOutcome {
            filled_qty,
            avg_price,
            touched_users: mut touched,
            executions: matched,
        } = outcome;
        touched.insert(order.user_id.clone());

        executions
            .entry(symbol.as_str().to_string())
            .or_default()
            .extend(matched.iter().cloned());

        let status = if filled_qty > 0 && order.remaining_qty == 0 {
            OrderStatus::Filled
        } else if filled_qty > 0 {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Accepted
        };

        let ack = OrderAck {
            order_id: order.order_id,
            status,
            filled_qty,
            remaining_qty: order.remaining_qty,
            avg_price,
            client_order_id: order.client_order_id.clone(),
            symbol: symbol.clone(),
            ts: Utc::now(),
        };

        let snapshots: Vec<(String, Vec<Order>)> = if self.open_orders_store.is_some() {
            touched
                .iter()
                .map(|user_id| (user_id.clone(), index::snapshot(books, open_orders, user_id)))
                .collect()
        } else {
            Vec::new()
        };

        drop(state);

        self.publish(&snapshots, &matched);
        Ok(ack)
    }

    /// Remove a resting order, returning its remaining holds to the wallet.
    pub fn cancel_order(&self, user_id: &str, order_id: &str) -> Result<OrderAck, EngineError> {
        let parsed: OrderId = order_id.parse().map_err(|_| EngineError::OrderNotFound)?;

        let mut state = self.lock_state();
        let EngineState {
            books,
            ledger,
            open_orders,
            ..
        } = &mut *state;

        let loc = open_orders
            .get(user_id)
            .and_then(|by_user| by_user.get(&parsed))
            .cloned()
            .ok_or(EngineError::OrderNotFound)?;

        let book = books
            .get_mut(loc.symbol.as_str())
            .ok_or(EngineError::BookNotFound)?;
        let mut order = book
            .remove(loc.side, loc.price, parsed)
            .ok_or(EngineError::BookNotFound)?;

        index::remove(open_orders, user_id, parsed);
        let filled_qty = order.filled_qty();
        reserve::release(ledger, &mut order);
        order.remaining_qty = 0;

        let ack = OrderAck {
            order_id: parsed,
            status: OrderStatus::Canceled,
            filled_qty,
            remaining_qty: 0,
            avg_price: 0,
            client_order_id: order.client_order_id.clone(),
            symbol: order.symbol.clone(),
            ts: Utc::now(),
        };

        let snapshot = self
            .open_orders_store
            .is_some()
            .then(|| index::snapshot(books, open_orders, user_id));

        drop(state);

        if let (Some(store), Some(orders)) = (&self.open_orders_store, snapshot) {
            if let Err(err) = store.set_user_orders(user_id, &orders) {
                tracing::warn!(user_id, error = %err, "failed to persist open orders snapshot");
            }
        }

        Ok(ack)
    }

    /// The user's open orders, preferring the external store when one is
    /// configured and readable.
    pub fn open_orders(&self, user_id: &str) -> Vec<Order> {
        if let Some(store) = &self.open_orders_store {
            match store.get_user_orders(user_id) {
                Ok(Some(mut orders)) => {
                    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                    return orders;
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(user_id, error = %err, "open orders store read failed, serving from memory");
                }
            }
        }

        let state = self.lock_state();
        index::snapshot(&state.books, &state.open_orders, user_id)
    }

    /// The full in-memory execution log for a symbol, in match order.
    pub fn executions(&self, symbol: &str) -> Vec<Execution> {
        let state = self.lock_state();
        state
            .executions
            .get(&book_key(symbol))
            .cloned()
            .unwrap_or_default()
    }

    /// The tail of the execution log, chronological order preserved.
    /// `limit == 0` means all.
    pub fn list_executions(&self, symbol: &str, limit: usize) -> Vec<Execution> {
        let state = self.lock_state();
        let Some(entries) = state.executions.get(&book_key(symbol)) else {
            return Vec::new();
        };
        if limit == 0 || limit >= entries.len() {
            return entries.clone();
        }
        entries[entries.len() - limit..].to_vec()
    }

    /// Aggregated depth view of both book sides. `depth == 0` means the
    /// default of 20. Unknown symbols yield empty sides.
    pub fn order_book_snapshot(&self, symbol: &str, depth: usize) -> OrderBookSnapshot {
        let depth = if depth == 0 { DEFAULT_BOOK_DEPTH } else { depth };

        let state = self.lock_state();
        let (bids, asks) = match state.books.get(&book_key(symbol)) {
            Some(book) => (book.bids.aggregate(depth), book.asks.aggregate(depth)),
            None => (Vec::new(), Vec::new()),
        };
        OrderBookSnapshot {
            symbol: symbol.to_string(),
            bids,
            asks,
            ts: Utc::now(),
        }
    }

    /// Administrative credit to a user's available balance.
    pub fn fund_wallet(&self, user_id: &str, asset: &str, amount: i64) {
        let mut state = self.lock_state();
        state.ledger.fund(user_id, asset, amount);
    }

    /// Deep copy of the user's wallet, creating it if unseen.
    pub fn wallet(&self, user_id: &str) -> Wallet {
        let mut state = self.lock_state();
        state.ledger.snapshot(user_id)
    }

    fn publish(&self, snapshots: &[(String, Vec<Order>)], matched: &[Execution]) {
        if let Some(store) = &self.open_orders_store {
            for (user_id, orders) in snapshots {
                if let Err(err) = store.set_user_orders(user_id, orders) {
                    tracing::warn!(user_id = %user_id, error = %err, "failed to persist open orders snapshot");
                }
            }
        }
        if let Some(sink) = &self.execution_sink {
            for execution in matched {
                if let Err(err) = sink.publish_execution(execution) {
                    tracing::warn!(trade_id = %execution.trade_id, error = %err, "failed to publish execution");
                }
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Books and execution logs are keyed by the canonical symbol form, so read
/// paths normalize their query the same way placements do.
fn book_key(symbol: &str) -> String {
    match Symbol::parse(symbol) {
        Ok(parsed) => parsed.as_str().to_string(),
        Err(_) => symbol.to_string(),
    }
}

fn validate(req: &PlaceOrderRequest) -> Result<Symbol, EngineError> {
    if req.user_id.is_empty() {
        return Err(EngineError::Validation("userId is required".to_string()));
    }
    if req.symbol.is_empty() {
        return Err(EngineError::Validation("symbol is required".to_string()));
    }
    let symbol =
        Symbol::parse(&req.symbol).map_err(|err| EngineError::Validation(err.to_string()))?;
    if req.qty <= 0 {
        return Err(EngineError::Validation("qty must be positive".to_string()));
    }
    if req.order_type == OrderType::LIMIT && req.price <= 0 {
        return Err(EngineError::Validation(
            "price must be positive for LIMIT order".to_string(),
        ));
    }
    Ok(symbol)
}
