//! In-memory `NotificationStore`, used for tests and local development
//! without a running Redis instance.

use crate::error::StoreError;
use crate::{NotificationRecord, NotificationStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

pub struct MemoryNotificationStore {
    records: RwLock<HashMap<i64, NotificationRecord>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn put(&self, order_id: i64, record: &NotificationRecord, _ttl_secs: Option<u64>) -> Result<(), StoreError> {
        self.records.write().unwrap().insert(order_id, record.clone());
        Ok(())
    }

    async fn get(&self, order_id: i64) -> Result<Option<NotificationRecord>, StoreError> {
        Ok(self.records.read().unwrap().get(&order_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryNotificationStore::new();
        let record = NotificationRecord {
            order_id: 42,
            user_id: 1,
            order_status: "succeeded".to_string(),
        };
        store.put(42, &record, None).await.unwrap();
        assert_eq!(store.get(42).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn overwrite_replaces_previous_value() {
        let store = MemoryNotificationStore::new();
        let first = NotificationRecord {
            order_id: 1,
            user_id: 1,
            order_status: "succeeded".to_string(),
        };
        let second = NotificationRecord {
            order_id: 1,
            user_id: 1,
            order_status: "failed".to_string(),
        };
        store.put(1, &first, None).await.unwrap();
        store.put(1, &second, None).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), Some(second));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_order_returns_none() {
        let store = MemoryNotificationStore::new();
        assert_eq!(store.get(999).await.unwrap(), None);
    }
}
