//! Redis implementations of the engine's outbound adapters.
//!
//! The open-orders store shadows each user's resting orders as a JSON blob;
//! the execution stream is the durable, ordered trade feed. Both speak
//! through a shared `r2d2` connection pool and are wired in only when Redis
//! is reachable at startup.

pub mod execution_stream;
pub mod open_orders;

pub use execution_stream::{RedisExecutionStreamReader, RedisExecutionStreamSink, DEFAULT_STREAM};
pub use open_orders::{RedisOpenOrdersStore, DEFAULT_KEY_PREFIX};
