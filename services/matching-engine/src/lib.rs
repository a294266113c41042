//! In-memory matching engine for a minimal multi-asset exchange.
//!
//! Price-time priority limit order books per symbol, an integer wallet
//! ledger with reservation bookkeeping, atomic trade settlement, and
//! contracts for the two outbound collaborators (open-orders store and
//! execution sink).
//!
//! **Key invariants:**
//! - No balance bucket ever goes negative
//! - Per-user reservations equal the sum of holds on that user's open orders
//! - The resting book is never crossed
//! - Order and trade sequences are strictly increasing for the process
//!   lifetime

pub mod adapters;
pub mod book;
pub mod engine;
pub mod ledger;
pub mod matching;
pub mod reserve;
pub mod settle;

mod index;

pub use engine::Engine;
