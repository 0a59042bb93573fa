//! The idempotency ledger: one `processed_events`-shaped table per
//! consuming service (§4.7).

use crate::error::Result;
use crate::types::ProcessedTable;
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// Attempt to record `event_id` as processed inside `tx`.
///
/// Returns `true` if this is the first observation of `event_id` (the
/// row was inserted) and `false` if it is a duplicate (the unique
/// constraint suppressed the insert). Because this lives in the same
/// transaction as the side effect the caller is also making, a rollback
/// undoes both together, preserving exactly-once effect.
pub async fn try_mark_processed_tx(
    tx: &mut Transaction<'_, Postgres>,
    table: ProcessedTable,
    event_id: i64,
) -> Result<bool> {
    let query = format!(
        "INSERT INTO {} (event_id) VALUES ($1) ON CONFLICT DO NOTHING",
        table.table_name()
    );

    let result = sqlx::query(&query).bind(event_id).execute(&mut **tx).await?;

    let first_observation = result.rows_affected() == 1;

    debug!(
        table = table.table_name(),
        event_id,
        first_observation,
        "idempotency ledger check"
    );

    Ok(first_observation)
}
