//! The notification consumer's per-message handler (§4.4).

use crate::error::NotificationError;
use orderflow_store::{NotificationRecord, NotificationStore};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PaymentStatusEvent {
    order_id: i64,
    user_id: i64,
    order_status: String,
}

/// Decode a `PaymentStatus` message, validate it, and overwrite the
/// store's record for its order id.
///
/// Duplicate delivery is harmless here: the write is a pure function of
/// the payload, so there is no ledger check before it, unlike the
/// payment consumer's settlement handler. A decode error is logged and
/// returned as `Err`, so the caller withholds the offset commit and the
/// broker redelivers the message.
pub async fn handle_payment_status(
    store: &dyn NotificationStore,
    payload: &[u8],
    ttl_secs: Option<u64>,
) -> Result<(), NotificationError> {
    let event: PaymentStatusEvent = match serde_json::from_slice(payload) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "payment.status payload did not decode, will be redelivered");
            return Err(e.into());
        }
    };

    if event.order_id <= 0 {
        return Err(NotificationError::Validation("order_id must be positive".to_string()));
    }
    if event.user_id <= 0 {
        return Err(NotificationError::Validation("user_id must be positive".to_string()));
    }
    if event.order_status != "succeeded" && event.order_status != "failed" {
        return Err(NotificationError::Validation(format!(
            "order_status must be succeeded or failed, got {}",
            event.order_status
        )));
    }

    let record = NotificationRecord {
        order_id: event.order_id,
        user_id: event.user_id,
        order_status: event.order_status,
    };

    store.put(event.order_id, &record, ttl_secs).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_store::MemoryNotificationStore;

    #[tokio::test]
    async fn materialises_valid_status() {
        let store = MemoryNotificationStore::new();
        let payload = br#"{"order_id":1,"user_id":2,"order_status":"succeeded"}"#;

        handle_payment_status(&store, payload, None).await.unwrap();

        let record = store.get(1).await.unwrap().unwrap();
        assert_eq!(record.order_status, "succeeded");
    }

    #[tokio::test]
    async fn rejects_invalid_status_value() {
        let store = MemoryNotificationStore::new();
        let payload = br#"{"order_id":1,"user_id":2,"order_status":"pending"}"#;

        let result = handle_payment_status(&store, payload, None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn duplicate_delivery_is_idempotent() {
        let store = MemoryNotificationStore::new();
        let payload = br#"{"order_id":1,"user_id":2,"order_status":"failed"}"#;

        handle_payment_status(&store, payload, None).await.unwrap();
        handle_payment_status(&store, payload, None).await.unwrap();

        let record = store.get(1).await.unwrap().unwrap();
        assert_eq!(record.order_status, "failed");
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_for_redelivery() {
        let store = MemoryNotificationStore::new();
        let payload = br#"{"not":"a payment status"}"#;

        let result = handle_payment_status(&store, payload, None).await;
        assert!(result.is_err());
        assert!(store.get(1).await.unwrap().is_none());
    }
}
