//! At-least-once stream consumer with manual commit discipline.

use crate::config::ConsumerConfig;
use crate::error::BrokerError;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer as _, StreamConsumer};
use rdkafka::message::Message as _;
use std::time::Duration;

/// A message read from the broker, decoupled from the `rdkafka` borrowed
/// message type so handlers can hold it across an `.await` point.
#[derive(Debug, Clone)]
pub struct BrokerMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub payload: Vec<u8>,
}

/// Port for reading a topic with at-least-once semantics: offsets are
/// committed only after the caller's handler has succeeded.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Poll for a single message, bounded by `timeout`. Returns `None` on
    /// a timed-out poll (a liveness tick, not an error) and
    /// `Some(Err(_))` on a genuine read error.
    async fn poll(&self, timeout: Duration) -> Option<Result<BrokerMessage, BrokerError>>;

    /// Commit the offset for `message`. Called only after its handler
    /// has returned `Ok(())`.
    async fn commit(&self, message: &BrokerMessage) -> Result<(), BrokerError>;
}

/// `rdkafka`-backed consumer: named group, earliest offset on a new
/// group, `enable.auto.commit=false`.
pub struct KafkaConsumer {
    inner: StreamConsumer,
}

impl KafkaConsumer {
    pub fn new(config: ConsumerConfig) -> Result<Self, BrokerError> {
        let inner: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.bootstrap_servers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set(
                "session.timeout.ms",
                config.session_timeout.as_millis().to_string(),
            )
            .create()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        inner
            .subscribe(&[config.topic.as_str()])
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { inner })
    }
}

#[async_trait]
impl Consumer for KafkaConsumer {
    async fn poll(&self, timeout: Duration) -> Option<Result<BrokerMessage, BrokerError>> {
        match tokio::time::timeout(timeout, self.inner.recv()).await {
            Err(_elapsed) => None,
            Ok(Err(kafka_err)) => Some(Err(BrokerError::Send(kafka_err.to_string()))),
            Ok(Ok(borrowed)) => {
                let payload = borrowed.payload().unwrap_or_default().to_vec();
                Some(Ok(BrokerMessage {
                    topic: borrowed.topic().to_string(),
                    partition: borrowed.partition(),
                    offset: borrowed.offset(),
                    payload,
                }))
            }
        }
    }

    async fn commit(&self, message: &BrokerMessage) -> Result<(), BrokerError> {
        let mut tpl = rdkafka::TopicPartitionList::new();
        tpl.add_partition_offset(
            &message.topic,
            message.partition,
            rdkafka::Offset::Offset(message.offset + 1),
        )
        .map_err(|e| BrokerError::Send(e.to_string()))?;

        self.inner
            .commit(&tpl, CommitMode::Sync)
            .map_err(|e| BrokerError::Send(e.to_string()))
    }
}
