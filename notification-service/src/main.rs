//! Notification service daemon.
//!
//! Consumes `payment.status` from the status topic and materialises the
//! last observed settlement outcome per order into Redis. Carries no
//! database connection of its own: this consumer's only durable state is
//! the key/value store.
//!
//! # Environment variables
//!
//! - `REDIS_URL`, `BROKER_BOOTSTRAP_SERVERS` (required)
//! - `NOTIFICATION_CONSUMER_GROUP_ID`, `STATUS_TOPIC`
//! - `BROKER_POLL_TIMEOUT_MS`, `NOTIFICATION_TTL_SECS` (unset or empty = no expiry)

use notification_service::{config::Config, handler};
use orderflow_broker::{run_consume_loop, BrokerError, ConsumerConfig, KafkaConsumer};
use orderflow_store::RedisNotificationStore;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("notification_service=info".parse()?))
        .init();

    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        group_id = %config.broker.group_id,
        "notification service starting"
    );

    let store = RedisNotificationStore::connect(&config.redis_url).await?;

    let consumer_config = ConsumerConfig::new(
        config.broker.bootstrap_servers.clone(),
        config.broker.group_id.clone(),
        config.broker.status_topic.clone(),
    );
    let consumer = KafkaConsumer::new(consumer_config)?;

    let shutdown = CancellationToken::new();
    let consume_shutdown = shutdown.clone();
    let poll_timeout = config.broker.poll_timeout;
    let ttl_secs = config.notification_ttl_secs;

    let consumer_handle = tokio::spawn(async move {
        run_consume_loop(&consumer, poll_timeout, consume_shutdown, |message| {
            let store = &store;
            async move {
                handler::handle_payment_status(store, &message.payload, ttl_secs)
                    .await
                    .map_err(|e| BrokerError::Send(e.to_string()))
            }
        })
        .await;
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    shutdown.cancel();

    let _ = consumer_handle.await;

    info!("notification service stopped");
    Ok(())
}
