//! Outbox and ledger table identifiers, and the outbox row shape.
//!
//! Table names are not accepted as free-form strings anywhere in this
//! crate: every query is parameterized over one of these two small
//! enums, so a caller cannot point the lease query at an arbitrary
//! table by constructing a bad string.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// One of the per-service outbox tables. Both share the schema
/// described in §6 (`events`-shaped: id, event_type, payload,
/// aggregate_id, created_at, locked_at, sent_at).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxTable {
    /// The order service's outbox, publishing to the `orders` topic.
    OrderEvents,
    /// The payment service's outbox, publishing to the `status` topic.
    PaymentEvents,
}

impl OutboxTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            OutboxTable::OrderEvents => "order_events",
            OutboxTable::PaymentEvents => "payment_events",
        }
    }
}

/// One of the per-consumer idempotency-ledger tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessedTable {
    /// The payment consumer's ledger, deduplicating `OrderCreated`.
    PaymentProcessedEvents,
    /// The notification consumer's ledger, deduplicating `PaymentStatus`.
    NotificationProcessedEvents,
}

impl ProcessedTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            ProcessedTable::PaymentProcessedEvents => "payment_processed_events",
            ProcessedTable::NotificationProcessedEvents => "notification_processed_events",
        }
    }
}

/// A row from an outbox table.
#[derive(Debug, Clone, FromRow)]
pub struct OutboxEvent {
    pub id: i64,
    pub event_type: String,
    pub payload: Value,
    pub aggregate_id: i64,
    pub created_at: DateTime<Utc>,
    pub locked_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
}
