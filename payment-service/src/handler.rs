//! The payment consumer's per-message handler (§4.3).

use crate::error::PaymentError;
use orderflow_domain::PaymentStatus;
use orderflow_outbox::{insert_event_tx, try_mark_processed_tx, OutboxTable, ProcessedTable};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

/// The `OrderCreated` payload as published by the order service's
/// outbox dispatcher. `event_id` is injected by the dispatcher from the
/// outbox row id, not carried in the row's stored payload.
#[derive(Debug, Deserialize)]
struct OrderCreatedEvent {
    event_id: i64,
    order_id: i64,
    user_id: i64,
    total_amount: i64,
}

/// The `PaymentStatus` payload this service writes to its own outbox.
#[derive(Debug, Serialize)]
struct PaymentStatusPayload {
    order_id: i64,
    user_id: i64,
    order_status: String,
}

/// Handle one `OrderCreated` message end to end: ledger check, payment
/// upsert, settlement decision, outbox write, all in one transaction.
///
/// Returns `Ok(())` both when the event was newly processed and when it
/// was a duplicate — either way the caller should commit the broker
/// offset. A decode error is logged and returned as `Err`, so the caller
/// withholds the offset commit and the broker redelivers the message.
pub async fn handle_order_created(pool: &PgPool, payload: &[u8]) -> Result<(), PaymentError> {
    let event: OrderCreatedEvent = match serde_json::from_slice(payload) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "order.created payload did not decode, will be redelivered");
            return Err(e.into());
        }
    };

    let mut tx = pool.begin().await?;

    let first_observation =
        try_mark_processed_tx(&mut tx, ProcessedTable::PaymentProcessedEvents, event.event_id).await?;

    if !first_observation {
        debug!(event_id = event.event_id, "duplicate order.created, skipping settlement");
        tx.commit().await?;
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO payments (order_id, user_id, total_amount, status) VALUES ($1, $2, $3, 'pending')
         ON CONFLICT (order_id) DO UPDATE SET status = 'pending'",
    )
    .bind(event.order_id)
    .bind(event.user_id)
    .bind(event.total_amount)
    .execute(&mut *tx)
    .await?;

    let status = PaymentStatus::decide(event.order_id);

    sqlx::query("UPDATE payments SET status = $1 WHERE order_id = $2")
        .bind(status.as_str())
        .bind(event.order_id)
        .execute(&mut *tx)
        .await?;

    let status_payload = PaymentStatusPayload {
        order_id: event.order_id,
        user_id: event.user_id,
        order_status: status.as_str().to_string(),
    };

    insert_event_tx(
        &mut tx,
        OutboxTable::PaymentEvents,
        "payment.status",
        &status_payload,
        event.order_id,
    )
    .await?;

    tx.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_created_decode_requires_event_id() {
        let raw = br#"{"order_id":1,"user_id":2}"#;
        let decoded: Result<OrderCreatedEvent, _> = serde_json::from_slice(raw);
        assert!(decoded.is_err());
    }

    #[test]
    fn order_created_decodes_with_event_id() {
        let raw = br#"{"event_id":5,"order_id":1,"user_id":2,"total_amount":500,"created_at":"2026-01-01T00:00:00Z"}"#;
        let decoded: OrderCreatedEvent = serde_json::from_slice(raw).unwrap();
        assert_eq!(decoded.event_id, 5);
        assert_eq!(decoded.order_id, 1);
    }
}
