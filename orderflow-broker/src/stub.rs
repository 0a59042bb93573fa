//! In-memory stand-ins for `Producer`/`Consumer`, used by unit and
//! integration tests that exercise the dispatcher and consumer loop
//! without a running broker.

use crate::consumer::{BrokerMessage, Consumer};
use crate::error::BrokerError;
use crate::producer::Producer;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Records every payload handed to `produce` for inspection by tests.
pub struct StubProducer {
    sent: Mutex<Vec<(String, Vec<u8>)>>,
    fail_next: Mutex<bool>,
}

impl StubProducer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_next: Mutex::new(false),
        }
    }

    /// Cause the next `produce` call to fail, simulating a broker-side
    /// rejection or an uncertain delivery.
    pub fn fail_next_send(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn sent_messages(&self) -> Vec<(String, Vec<u8>)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for StubProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Producer for StubProducer {
    async fn produce(
        &self,
        topic: &str,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), BrokerError> {
        if cancel.is_cancelled() {
            return Err(BrokerError::Cancelled);
        }
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(BrokerError::Send("stub: forced failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn close(&self) -> usize {
        0
    }
}

/// A fixed queue of messages replayed to every `poll` call, with no
/// backing broker. `commit` is a no-op recorder.
pub struct StubConsumer {
    queue: Mutex<VecDeque<BrokerMessage>>,
    committed: Mutex<Vec<i64>>,
}

impl StubConsumer {
    pub fn new(messages: Vec<BrokerMessage>) -> Self {
        Self {
            queue: Mutex::new(messages.into()),
            committed: Mutex::new(Vec::new()),
        }
    }

    pub fn committed_offsets(&self) -> Vec<i64> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Consumer for StubConsumer {
    async fn poll(&self, _timeout: Duration) -> Option<Result<BrokerMessage, BrokerError>> {
        self.queue.lock().unwrap().pop_front().map(Ok)
    }

    async fn commit(&self, message: &BrokerMessage) -> Result<(), BrokerError> {
        self.committed.lock().unwrap().push(message.offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_producer_records_sends() {
        let producer = StubProducer::new();
        let cancel = CancellationToken::new();
        producer.produce("orders", b"payload", &cancel).await.unwrap();
        assert_eq!(producer.sent_messages(), vec![("orders".to_string(), b"payload".to_vec())]);
    }

    #[tokio::test]
    async fn stub_producer_honours_cancellation() {
        let producer = StubProducer::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = producer.produce("orders", b"payload", &cancel).await;
        assert!(matches!(result, Err(BrokerError::Cancelled)));
    }

    #[tokio::test]
    async fn stub_producer_forced_failure_leaves_nothing_sent() {
        let producer = StubProducer::new();
        producer.fail_next_send();
        let cancel = CancellationToken::new();
        let result = producer.produce("orders", b"payload", &cancel).await;
        assert!(result.is_err());
        assert!(producer.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn stub_consumer_commits_only_what_is_polled() {
        let msg = BrokerMessage {
            topic: "orders".to_string(),
            partition: 0,
            offset: 7,
            payload: b"{}".to_vec(),
        };
        let consumer = StubConsumer::new(vec![msg.clone()]);
        let polled = consumer.poll(Duration::from_millis(10)).await.unwrap().unwrap();
        consumer.commit(&polled).await.unwrap();
        assert_eq!(consumer.committed_offsets(), vec![7]);
    }
}
