//! Synchronous-delivery producer wrapper.

use crate::config::ProducerConfig;
use crate::error::BrokerError;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Port for publishing a single payload to a topic and awaiting
/// acknowledgement before returning.
///
/// The outbox dispatcher is the only caller: it leases a row, produces
/// its payload, and only marks the row sent once `produce` returns
/// `Ok(())`. A `Cancelled` or `Send` error leaves the row leased so it is
/// retried — see `orderflow_outbox::dispatcher`.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Publish `payload` to `topic`, awaiting a single delivery
    /// acknowledgement. Partition selection is automatic; no partition
    /// key is set (see design notes on partition keying).
    async fn produce(
        &self,
        topic: &str,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), BrokerError>;

    /// Flush outstanding messages for up to the configured flush
    /// timeout, returning the number that remained undelivered.
    async fn close(&self) -> usize;
}

/// `rdkafka`-backed producer with idempotent writes and `acks=all`.
pub struct KafkaProducer {
    inner: FutureProducer,
    config: ProducerConfig,
}

impl KafkaProducer {
    /// Build a producer from `config`. Fails fast (`fatal_config`) if the
    /// client cannot be constructed.
    pub fn new(config: ProducerConfig) -> Result<Self, BrokerError> {
        let inner = ClientConfig::new()
            .set("bootstrap.servers", &config.bootstrap_servers)
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", config.retries.to_string())
            .set(
                "request.timeout.ms",
                config.request_timeout.as_millis().to_string(),
            )
            .set(
                "message.timeout.ms",
                config.delivery_timeout.as_millis().to_string(),
            )
            .create()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { inner, config })
    }
}

#[async_trait]
impl Producer for KafkaProducer {
    async fn produce(
        &self,
        topic: &str,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), BrokerError> {
        let record: FutureRecord<'_, (), [u8]> = FutureRecord::to(topic).payload(payload);

        tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(BrokerError::Cancelled),

            result = self.inner.send(record, Timeout::Never) => {
                match result {
                    Ok(_delivery) => Ok(()),
                    Err((kafka_err, _owned_message)) => Err(BrokerError::Send(kafka_err.to_string())),
                }
            }
        }
    }

    async fn close(&self) -> usize {
        match self.inner.flush(self.config.flush_timeout) {
            Ok(()) => 0,
            Err(e) => {
                warn!(error = %e, "producer flush did not complete before timeout");
                self.inner.in_flight_count() as usize
            }
        }
    }
}

/// Default poll interval used by callers that need to wait on the
/// flush timeout in whole-second increments (used only by `main`
/// shutdown sequences, not by `produce` itself).
pub const DEFAULT_FLUSH_POLL: Duration = Duration::from_millis(100);
