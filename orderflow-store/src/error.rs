//! Notification store errors.

use thiserror::Error;

/// Errors raised by `NotificationStore` implementations.
///
/// A `transient_storage` error in the abstract taxonomy: the
/// notification consumer logs it and withholds the broker offset commit,
/// so the message is redelivered.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key/value store connection error: {0}")]
    Connection(String),

    #[error("key/value store operation failed: {0}")]
    Operation(String),

    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
