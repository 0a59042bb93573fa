//! Broker error types.

use thiserror::Error;

/// Errors raised by the broker producer and consumer.
///
/// Maps to the abstract `transient_broker` and `cancelled` error kinds:
/// callers (the outbox dispatcher, the consumer loop) treat every variant
/// here as retryable at the next tick/poll, except `Cancelled`, which
/// propagates the shutdown signal.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The broker rejected the send, or no delivery acknowledgement
    /// arrived before the configured delivery timeout.
    #[error("broker send failed: {0}")]
    Send(String),

    /// The calling context was cancelled while a send or poll was
    /// in flight. Delivery is uncertain, not known-failed.
    #[error("broker operation cancelled")]
    Cancelled,

    /// A poll did not return a message before the configured read timeout.
    /// Not an error condition, but a distinct outcome callers branch on.
    #[error("poll timed out")]
    Timeout,

    /// The underlying client could not be constructed or connected.
    #[error("broker connection error: {0}")]
    Connection(String),

    /// A message body could not be decoded as the expected payload.
    #[error("payload decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
