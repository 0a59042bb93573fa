//! Transactional outbox and idempotent-consumer-ledger primitives.
//!
//! This is the distributed-messaging backbone of the platform: the
//! append-within-transaction, the SKIP LOCKED lease, the mark-sent step,
//! the dispatcher loop, and the per-consumer `processed_events` ledger.
//!
//! # Components
//!
//! - **[`append`]**: insert an outbox row inside an existing transaction
//! - **[`lease`]**: lease and mark-sent, the two halves of one dispatch
//! - **[`ledger`]**: the idempotency ledger insert-on-conflict-do-nothing
//! - **[`dispatcher`]**: the polling loop that ties lease + publish + mark-sent together

#![warn(clippy::all)]

pub mod append;
pub mod dispatcher;
pub mod error;
pub mod ledger;
pub mod lease;
pub mod types;

pub use append::insert_event_tx;
pub use dispatcher::OutboxDispatcher;
pub use error::OutboxError;
pub use ledger::try_mark_processed_tx;
pub use lease::{lease_next, mark_sent, LeasedEvent};
pub use types::{OutboxTable, ProcessedTable};
