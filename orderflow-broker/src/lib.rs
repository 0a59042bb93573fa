//! Broker ports: a synchronous-delivery producer and an at-least-once
//! consumer, both backed by Kafka.
//!
//! # Architecture
//!
//! ```text
//! Outbox dispatcher -> Producer -> topic -> Consumer -> handler -> commit
//! ```
//!
//! Adapters (`KafkaProducer`, `KafkaConsumer`) wrap `rdkafka`; the `Producer`
//! and `Consumer` traits are the seams other crates program against so
//! tests can swap in stubs without a running broker.

#![warn(clippy::all)]

pub mod config;
pub mod consumer;
pub mod error;
pub mod loop_driver;
pub mod producer;
pub mod stub;

pub use config::{ConsumerConfig, ProducerConfig};
pub use consumer::{BrokerMessage, Consumer, KafkaConsumer};
pub use error::BrokerError;
pub use loop_driver::run_consume_loop;
pub use producer::{KafkaProducer, Producer};
pub use stub::{StubConsumer, StubProducer};
