mod config;
mod error;
mod handlers;
mod router;
mod state;

use exchange_store::{RedisExecutionStreamReader, RedisExecutionStreamSink, RedisOpenOrdersStore};
use matching_engine::Engine;
use r2d2_redis::r2d2::Pool;
use r2d2_redis::{redis, RedisConnectionManager};
use router::create_router;
use state::{AppState, TradeSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let cfg = config::load();
    let state = build_state(&cfg);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("matching engine API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(cfg: &config::ApiConfig) -> AppState {
    let Some(redis_url) = &cfg.redis_url else {
        return in_memory_state();
    };

    match connect_redis(redis_url) {
        Ok(pool) => {
            tracing::info!(url = %redis_url, "redis integration enabled");
            let stream = format!("{}:stream:executions", cfg.key_prefix);
            let store = RedisOpenOrdersStore::new(pool.clone(), cfg.key_prefix.clone());
            let sink = RedisExecutionStreamSink::new(pool.clone(), stream.clone());
            let reader = RedisExecutionStreamReader::new(pool, stream);

            let engine = Arc::new(Engine::with_adapters(
                Some(Arc::new(store)),
                Some(Arc::new(sink)),
            ));
            AppState {
                engine,
                trade_source: Arc::new(reader),
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "redis integration disabled (connection failed)");
            in_memory_state()
        }
    }
}

fn in_memory_state() -> AppState {
    let engine = Arc::new(Engine::new());
    let trade_source: Arc<dyn TradeSource> = engine.clone();
    AppState {
        engine,
        trade_source,
    }
}

fn connect_redis(url: &str) -> anyhow::Result<Pool<RedisConnectionManager>> {
    let manager = RedisConnectionManager::new(url)?;
    let pool = Pool::builder().max_size(8).build(manager)?;

    let mut conn = pool.get()?;
    redis::cmd("PING").query::<String>(&mut *conn)?;
    Ok(pool)
}
