//! Notification consumer error types (§4.4, §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] orderflow_store::StoreError),
}
