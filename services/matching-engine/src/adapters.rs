//! Outbound adapter contracts.
//!
//! Both adapters are optional: without them the engine serves open orders
//! and executions from its own state. They are invoked strictly after the
//! engine lock is released, so implementations are free to block; failures
//! are logged by the caller and never roll back in-memory state.

use exchange_types::execution::Execution;
use exchange_types::order::Order;

/// Authoritative external view of each user's open orders.
pub trait OpenOrdersStore: Send + Sync {
    /// Idempotent replacement of the user's entire open-order list. An empty
    /// list deletes the entry.
    fn set_user_orders(&self, user_id: &str, orders: &[Order]) -> anyhow::Result<()>;

    /// The stored list, or `None` when the user has no entry.
    fn get_user_orders(&self, user_id: &str) -> anyhow::Result<Option<Vec<Order>>>;
}

/// Append-only consumer of the execution stream. The engine publishes in
/// match order per symbol.
pub trait ExecutionSink: Send + Sync {
    fn publish_execution(&self, execution: &Execution) -> anyhow::Result<()>;
}
