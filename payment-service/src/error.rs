//! Payment consumer error types (§4.3, §7).

use thiserror::Error;

/// Errors from one handler invocation. Every variant here withholds the
/// broker offset commit, forcing redelivery: `Decode` for a payload that
/// never parsed, `Storage` for a transaction that failed to commit.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
