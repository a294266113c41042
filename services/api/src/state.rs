//! Shared application state and the trade listing source.

use crate::error::ApiError;
use exchange_store::RedisExecutionStreamReader;
use exchange_types::execution::Execution;
use matching_engine::Engine;
use std::sync::Arc;

/// Where trade listings come from: the durable Redis stream when configured,
/// otherwise the engine's in-memory log.
pub trait TradeSource: Send + Sync {
    fn list_executions(&self, symbol: &str, limit: usize) -> anyhow::Result<Vec<Execution>>;
}

impl TradeSource for Engine {
    fn list_executions(&self, symbol: &str, limit: usize) -> anyhow::Result<Vec<Execution>> {
        Ok(Engine::list_executions(self, symbol, limit))
    }
}

impl TradeSource for RedisExecutionStreamReader {
    fn list_executions(&self, symbol: &str, limit: usize) -> anyhow::Result<Vec<Execution>> {
        RedisExecutionStreamReader::list_executions(self, symbol, limit)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub trade_source: Arc<dyn TradeSource>,
}

/// Engine calls may block on adapter I/O after releasing the engine lock,
/// so they run on the blocking pool rather than a worker thread.
pub async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::Internal(err.into()))
}
