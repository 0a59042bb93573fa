//! Notification key/value store (§4.4, §6).
//!
//! The notification consumer materialises the latest `PaymentStatus`
//! per order into this store, overwriting the previous value on every
//! delivery. Because the write is a pure function of the payload,
//! duplicate delivery is harmless: applying it twice leaves the same
//! state as applying it once.

#![warn(clippy::all)]

mod error;
mod memory;
mod redis_store;

pub use error::StoreError;
pub use memory::MemoryNotificationStore;
pub use redis_store::RedisNotificationStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A materialised settlement outcome for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub order_id: i64,
    pub user_id: i64,
    pub order_status: String,
}

/// Port for the key/value store backing notification materialisation.
///
/// Implementations: `RedisNotificationStore` for production,
/// `MemoryNotificationStore` for tests.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Overwrite the record for `order_id`, with an optional TTL in
    /// seconds. The key is the bare decimal order id, never scoped by
    /// `user_id` (see design notes on notification keying).
    async fn put(&self, order_id: i64, record: &NotificationRecord, ttl_secs: Option<u64>) -> Result<(), StoreError>;

    /// Fetch the current record for `order_id`, or `None` if nothing has
    /// been written for it yet (or it expired).
    async fn get(&self, order_id: i64) -> Result<Option<NotificationRecord>, StoreError>;
}
