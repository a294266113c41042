//! Error taxonomy for the matching engine.

use thiserror::Error;

/// Every failure an engine operation can surface to a caller.
///
/// Validation and reservation errors abort before any state change.
/// `BookNotFound` and `BalanceUnderflow` signal internal inconsistencies
/// that are unreachable while the engine invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid order: {0}")]
    Validation(String),

    #[error("insufficient {asset} balance: required {required}, available {available}")]
    InsufficientFunds {
        asset: String,
        required: i64,
        available: i64,
    },

    #[error("no liquidity for market order")]
    NoLiquidity,

    #[error("order not found")]
    OrderNotFound,

    #[error("order book not found")]
    BookNotFound,

    #[error("reserved {asset} balance underflow")]
    BalanceUnderflow { asset: String },
}
