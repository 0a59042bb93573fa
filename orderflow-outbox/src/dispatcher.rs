//! The outbox dispatcher loop (§4.2): lease, publish, mark-sent.

use crate::error::Result;
use crate::lease::{lease_next, mark_sent};
use crate::types::OutboxTable;
use orderflow_broker::Producer;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default lease timeout: a `LEASED` row older than this is reclaimable.
pub const DEFAULT_LEASE_TIMEOUT_SECS: i64 = 60;

/// Default dispatcher tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drains one outbox table to one broker topic.
///
/// Multiple instances of this dispatcher (even across processes) may run
/// concurrently against the same table: correctness is maintained by the
/// `SKIP LOCKED` lease query, not by any coordination between instances.
pub struct OutboxDispatcher<P: Producer> {
    pool: PgPool,
    table: OutboxTable,
    topic: String,
    producer: Arc<P>,
    tick_period: Duration,
    lease_timeout_secs: i64,
}

impl<P: Producer> OutboxDispatcher<P> {
    pub fn new(pool: PgPool, table: OutboxTable, topic: impl Into<String>, producer: Arc<P>) -> Self {
        Self {
            pool,
            table,
            topic: topic.into(),
            producer,
            tick_period: DEFAULT_TICK_PERIOD,
            lease_timeout_secs: DEFAULT_LEASE_TIMEOUT_SECS,
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    pub fn with_lease_timeout_secs(mut self, secs: i64) -> Self {
        self.lease_timeout_secs = secs;
        self
    }

    /// Run until `shutdown` fires. Each tick drains at most one row;
    /// an empty outbox or a publish failure both simply wait for the
    /// next tick rather than retrying in a hot loop.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.tick_period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!(table = self.table.table_name(), "dispatcher exiting on cancellation");
                    break;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.dispatch_once(&shutdown).await {
                        warn!(table = self.table.table_name(), error = %e, "dispatch tick failed");
                    }
                }
            }
        }
    }

    /// One polling iteration of §4.2's protocol.
    async fn dispatch_once(&self, shutdown: &CancellationToken) -> Result<()> {
        let leased = match lease_next(&self.pool, self.table, self.lease_timeout_secs).await? {
            Some(row) => row,
            None => return Ok(()),
        };

        // The row's stored payload never carries its own event_id: the
        // dispatcher assigns it from the just-leased row id, so the
        // wire event_id and the outbox row id share one id space.
        let mut payload = leased.payload.clone();
        if let Value::Object(ref mut map) = payload {
            map.insert("event_id".to_string(), Value::from(leased.id));
        }

        let bytes = match serde_json::to_vec(&payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = leased.id, error = %e, "outbox payload would not serialize, skipping this tick");
                return Ok(());
            }
        };

        match self.producer.produce(&self.topic, &bytes, shutdown).await {
            Ok(()) => {
                if let Err(e) = mark_sent(&self.pool, self.table, leased.id).await {
                    warn!(
                        id = leased.id,
                        error = %e,
                        "mark-sent failed after a successful publish; row remains leased and will be re-published"
                    );
                    return Err(e);
                }
            }
            Err(e) => {
                debug!(id = leased.id, error = %e, "publish failed; lease will expire and the row will be retried");
            }
        }

        Ok(())
    }
}
