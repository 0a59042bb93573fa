//! Redis-backed `NotificationStore`.

use crate::error::StoreError;
use crate::{NotificationRecord, NotificationStore};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Wraps a `redis::aio::ConnectionManager`, which reconnects
/// transparently and is safe to share across tasks.
pub struct RedisNotificationStore {
    conn: ConnectionManager,
}

impl RedisNotificationStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url).map_err(|e| StoreError::Connection(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { conn })
    }

    fn key(order_id: i64) -> String {
        order_id.to_string()
    }
}

#[async_trait]
impl NotificationStore for RedisNotificationStore {
    async fn put(&self, order_id: i64, record: &NotificationRecord, ttl_secs: Option<u64>) -> Result<(), StoreError> {
        let value = serde_json::to_string(record)?;
        let mut conn = self.conn.clone();
        match ttl_secs {
            // A TTL of zero (the default when unset) means no expiry,
            // matching the source store's Set(..., 0) call.
            Some(ttl) if ttl > 0 => conn
                .set_ex::<_, _, ()>(Self::key(order_id), value, ttl)
                .await
                .map_err(|e| StoreError::Operation(e.to_string())),
            _ => conn
                .set::<_, _, ()>(Self::key(order_id), value)
                .await
                .map_err(|e| StoreError::Operation(e.to_string())),
        }
    }

    async fn get(&self, order_id: i64) -> Result<Option<NotificationRecord>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .get(Self::key(order_id))
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        match value {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
