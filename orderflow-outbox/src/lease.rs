//! The lease and mark-sent halves of one dispatch iteration (§4.2).

use crate::error::Result;
use crate::types::OutboxTable;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::debug;

/// An outbox row that has just been leased: its `locked_at` has been set
/// and the row-level lock released by the commit that follows.
#[derive(Debug, Clone, FromRow)]
pub struct LeasedEvent {
    pub id: i64,
    pub payload: Value,
}

/// Atomically select and lease one eligible row, if any.
///
/// Eligibility: `sent_at IS NULL AND (locked_at IS NULL OR locked_at <
/// now() - lease_timeout)`, ordered by `created_at` ascending. The
/// `FOR UPDATE SKIP LOCKED` clause is what keeps the leased-and-unexpired
/// set disjoint across concurrently running dispatchers without any
/// leader election.
///
/// Returns `None` if no row is currently eligible; this is not an error
/// and the dispatcher simply waits for the next tick.
pub async fn lease_next(
    pool: &PgPool,
    table: OutboxTable,
    lease_timeout_secs: i64,
) -> Result<Option<LeasedEvent>> {
    let name = table.table_name();
    let query = format!(
        "UPDATE {name} \
         SET locked_at = now() \
         WHERE id = ( \
             SELECT id FROM {name} \
             WHERE sent_at IS NULL \
               AND (locked_at IS NULL OR locked_at < now() - make_interval(secs => $1)) \
             ORDER BY created_at \
             FOR UPDATE SKIP LOCKED \
             LIMIT 1 \
         ) \
         RETURNING id, payload"
    );

    let mut tx = pool.begin().await?;

    let leased: Option<LeasedEvent> = sqlx::query_as(&query)
        .bind(lease_timeout_secs as f64)
        .fetch_optional(&mut *tx)
        .await?;

    tx.commit().await?;

    if let Some(ref row) = leased {
        debug!(table = name, id = row.id, "outbox row leased");
    }

    Ok(leased)
}

/// Mark a leased row `SENT`, clearing its lease.
///
/// If this fails after a successful publish, the row stays `LEASED` with
/// `sent_at` still null; it will be re-leased once the lease expires and
/// re-published. The consumer-side ledger (`ledger::try_mark_processed_tx`)
/// is what neutralises the resulting duplicate.
pub async fn mark_sent(pool: &PgPool, table: OutboxTable, id: i64) -> Result<()> {
    let name = table.table_name();
    let query = format!("UPDATE {name} SET sent_at = now(), locked_at = NULL WHERE id = $1");

    sqlx::query(&query).bind(id).execute(pool).await?;

    debug!(table = name, id, "outbox row marked sent");
    Ok(())
}

/// Row timestamps, exposed for tests asserting on the NEW/LEASED/SENT
/// state machine directly.
#[derive(Debug, Clone, FromRow)]
pub struct LeaseState {
    pub locked_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
}
