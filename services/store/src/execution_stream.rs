//! Redis stream sink and reader for executions.
//!
//! Every trade is appended to one stream with snake_case fields and an
//! RFC 3339 timestamp with nanoseconds, so downstream consumers (ledger
//! writers, candle builders) replay trades in the exact order the matcher
//! produced them. Stream commands go through `redis::cmd` directly.

use chrono::{DateTime, SecondsFormat, Utc};
use exchange_types::execution::Execution;
use exchange_types::symbol::Symbol;
use matching_engine::adapters::ExecutionSink;
use r2d2_redis::r2d2::Pool;
use r2d2_redis::{redis, RedisConnectionManager};
use std::collections::HashMap;

pub const DEFAULT_STREAM: &str = "exchange:v1:stream:executions";

const DEFAULT_LIST_LIMIT: usize = 100;
const MIN_FETCH_COUNT: usize = 100;

fn stream_or_default(stream: impl Into<String>) -> String {
    let stream = stream.into();
    if stream.is_empty() {
        DEFAULT_STREAM.to_string()
    } else {
        stream
    }
}

pub struct RedisExecutionStreamSink {
    pool: Pool<RedisConnectionManager>,
    stream: String,
}

impl RedisExecutionStreamSink {
    pub fn new(pool: Pool<RedisConnectionManager>, stream: impl Into<String>) -> Self {
        Self {
            pool,
            stream: stream_or_default(stream),
        }
    }
}

impl ExecutionSink for RedisExecutionStreamSink {
    fn publish_execution(&self, execution: &Execution) -> anyhow::Result<()> {
        let mut conn = self.pool.get()?;
        let mut cmd = redis::cmd("XADD");
        cmd.arg(&self.stream).arg("*");
        for (field, value) in execution_fields(execution) {
            cmd.arg(field).arg(value);
        }
        cmd.query::<String>(&mut *conn)?;
        Ok(())
    }
}

/// Reads the execution stream back for trade listings, so the REST surface
/// serves the same durable history the downstream consumers see.
pub struct RedisExecutionStreamReader {
    pool: Pool<RedisConnectionManager>,
    stream: String,
}

impl RedisExecutionStreamReader {
    pub fn new(pool: Pool<RedisConnectionManager>, stream: impl Into<String>) -> Self {
        Self {
            pool,
            stream: stream_or_default(stream),
        }
    }

    /// The most recent `limit` executions for `symbol`, oldest first.
    /// `limit == 0` means the default of 100.
    ///
    /// The stream interleaves all symbols, so this over-fetches from the
    /// tail and filters; entries that fail to decode are skipped.
    pub fn list_executions(&self, symbol: &str, limit: usize) -> anyhow::Result<Vec<Execution>> {
        let limit = if limit == 0 { DEFAULT_LIST_LIMIT } else { limit };
        let fetch_count = (limit * 20).max(MIN_FETCH_COUNT);

        let mut conn = self.pool.get()?;
        let entries: Vec<(String, Vec<String>)> = redis::cmd("XREVRANGE")
            .arg(&self.stream)
            .arg("+")
            .arg("-")
            .arg("COUNT")
            .arg(fetch_count)
            .query(&mut *conn)?;

        let mut filtered = Vec::with_capacity(limit);
        for (_entry_id, fields) in entries {
            let Some(execution) = decode_execution(&fields) else {
                continue;
            };
            if execution.symbol.as_str() != symbol {
                continue;
            }
            filtered.push(execution);
            if filtered.len() == limit {
                break;
            }
        }

        filtered.reverse();
        Ok(filtered)
    }
}

fn execution_fields(execution: &Execution) -> Vec<(&'static str, String)> {
    vec![
        ("trade_id", execution.trade_id.to_string()),
        ("symbol", execution.symbol.as_str().to_string()),
        ("price", execution.price.to_string()),
        ("qty", execution.qty.to_string()),
        ("maker_order_id", execution.maker_order_id.to_string()),
        ("maker_user_id", execution.maker_user_id.clone()),
        ("taker_order_id", execution.taker_order_id.to_string()),
        ("taker_user_id", execution.taker_user_id.clone()),
        (
            "ts",
            execution.ts.to_rfc3339_opts(SecondsFormat::Nanos, true),
        ),
    ]
}

fn decode_execution(fields: &[String]) -> Option<Execution> {
    let mut map = HashMap::new();
    for pair in fields.chunks(2) {
        if let [field, value] = pair {
            map.insert(field.as_str(), value.as_str());
        }
    }

    let ts = DateTime::parse_from_rfc3339(map.get("ts")?)
        .ok()?
        .with_timezone(&Utc);

    Some(Execution {
        trade_id: map.get("trade_id")?.parse().ok()?,
        symbol: Symbol::parse(map.get("symbol")?).ok()?,
        price: map.get("price")?.parse().ok()?,
        qty: map.get("qty")?.parse().ok()?,
        maker_order_id: map.get("maker_order_id")?.parse().ok()?,
        maker_user_id: (*map.get("maker_user_id")?).to_string(),
        taker_order_id: map.get("taker_order_id")?.parse().ok()?,
        taker_user_id: (*map.get("taker_user_id")?).to_string(),
        ts,
    })
}
