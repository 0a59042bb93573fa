//! Broker client configuration.
//!
//! Values here correspond directly to the recognized configuration
//! options in the external-interfaces contract: broker addresses, topic
//! names, consumer group id, timeouts, and the producer's idempotency
//! and acknowledgement settings.

use std::time::Duration;

/// Producer-side configuration.
///
/// Defaults match the mandated wrapper configuration: idempotent writes,
/// `acks=all`, at least 10 retries, a 15s request timeout and a 60s
/// delivery timeout.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    pub bootstrap_servers: String,
    pub request_timeout: Duration,
    pub delivery_timeout: Duration,
    pub retries: u32,
    pub flush_timeout: Duration,
}

impl ProducerConfig {
    pub fn new(bootstrap_servers: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            request_timeout: Duration::from_secs(15),
            delivery_timeout: Duration::from_secs(60),
            retries: 10,
            flush_timeout: Duration::from_secs(10),
        }
    }
}

/// Consumer-side configuration.
///
/// `enable.auto.commit` is always false for consumers built from this
/// config; offsets are committed explicitly after the handler succeeds.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub bootstrap_servers: String,
    pub group_id: String,
    pub topic: String,
    pub session_timeout: Duration,
    pub poll_timeout: Duration,
}

impl ConsumerConfig {
    pub fn new(
        bootstrap_servers: impl Into<String>,
        group_id: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            group_id: group_id.into(),
            topic: topic.into(),
            session_timeout: Duration::from_secs(10),
            poll_timeout: Duration::from_millis(500),
        }
    }
}
