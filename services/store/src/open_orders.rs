//! Redis-backed open-orders store.
//!
//! Each user's open-order list is one JSON blob under
//! `<prefix>:orders:open:<userId>`. Writing an empty list deletes the key,
//! so the store never accumulates entries for users with nothing resting.

use exchange_types::order::Order;
use matching_engine::adapters::OpenOrdersStore;
use r2d2_redis::r2d2::Pool;
use r2d2_redis::redis::Commands;
use r2d2_redis::RedisConnectionManager;

pub const DEFAULT_KEY_PREFIX: &str = "exchange:v1";

pub struct RedisOpenOrdersStore {
    pool: Pool<RedisConnectionManager>,
    prefix: String,
}

impl RedisOpenOrdersStore {
    pub fn new(pool: Pool<RedisConnectionManager>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let prefix = if prefix.is_empty() {
            DEFAULT_KEY_PREFIX.to_string()
        } else {
            prefix
        };
        Self { pool, prefix }
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}:orders:open:{}", self.prefix, user_id)
    }
}

impl OpenOrdersStore for RedisOpenOrdersStore {
    fn set_user_orders(&self, user_id: &str, orders: &[Order]) -> anyhow::Result<()> {
        let mut conn = self.pool.get()?;
        if orders.is_empty() {
            conn.del::<_, ()>(self.key(user_id))?;
            return Ok(());
        }

        let payload = serde_json::to_string(orders)?;
        conn.set::<_, _, ()>(self.key(user_id), payload)?;
        Ok(())
    }

    fn get_user_orders(&self, user_id: &str) -> anyhow::Result<Option<Vec<Order>>> {
        let mut conn = self.pool.get()?;
        let payload: Option<String> = conn.get(self.key(user_id))?;
        match payload {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}
