//! Appending an outbox row inside the caller's own transaction.

use crate::error::Result;
use crate::types::OutboxTable;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// Insert an outbox row for `payload` inside `tx`, so it commits or
/// rolls back together with whatever business write the caller is also
/// making in this transaction.
///
/// Either both the business row(s) and this outbox row exist after
/// `tx.commit()`, or neither does.
pub async fn insert_event_tx(
    tx: &mut Transaction<'_, Postgres>,
    table: OutboxTable,
    event_type: &str,
    payload: &impl Serialize,
    aggregate_id: i64,
) -> Result<i64> {
    let payload: Value = serde_json::to_value(payload)?;

    let query = format!(
        "INSERT INTO {} (event_type, payload, aggregate_id, created_at) \
         VALUES ($1, $2, $3, now()) RETURNING id",
        table.table_name()
    );

    let id: i64 = sqlx::query_scalar(&query)
        .bind(event_type)
        .bind(&payload)
        .bind(aggregate_id)
        .fetch_one(&mut **tx)
        .await?;

    debug!(
        table = table.table_name(),
        id,
        event_type,
        aggregate_id,
        "outbox row appended"
    );

    Ok(id)
}
