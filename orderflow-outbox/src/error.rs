//! Outbox and ledger error types.

use thiserror::Error;

/// Errors raised by the outbox and idempotency-ledger primitives.
///
/// Every variant here is a `transient_storage` error in the abstract
/// taxonomy: the dispatcher and consumer loops log it and retry at the
/// next tick/poll rather than propagating it as a hard failure.
#[derive(Debug, Error)]
pub enum OutboxError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OutboxError>;
