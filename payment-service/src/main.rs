//! Payment service daemon.
//!
//! Consumes `order.created` from the orders topic, settles each order
//! via the deterministic stub rule, and runs its own `payment_events`
//! outbox dispatcher publishing to the status topic.
//!
//! # Environment variables
//!
//! - `DATABASE_URL`, `BROKER_BOOTSTRAP_SERVERS` (required)
//! - `PAYMENT_CONSUMER_GROUP_ID`, `ORDERS_TOPIC`, `STATUS_TOPIC`
//! - `BROKER_POLL_TIMEOUT_MS`, `DISPATCHER_TICK_PERIOD_SECS`, `OUTBOX_LEASE_TIMEOUT_SECS`

use orderflow_broker::{run_consume_loop, ConsumerConfig, KafkaConsumer, KafkaProducer, ProducerConfig};
use payment_service::{config::Config, handler};
use orderflow_outbox::{OutboxDispatcher, OutboxTable};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("payment_service=info".parse()?))
        .init();

    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        group_id = %config.broker.group_id,
        "payment service starting"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    orderflow_db::migrate(&pool).await?;

    let producer_config = ProducerConfig::new(config.broker.bootstrap_servers.clone());
    let producer = Arc::new(KafkaProducer::new(producer_config)?);

    let consumer_config = ConsumerConfig::new(
        config.broker.bootstrap_servers.clone(),
        config.broker.group_id.clone(),
        config.broker.orders_topic.clone(),
    );
    let consumer = KafkaConsumer::new(consumer_config)?;

    let shutdown = CancellationToken::new();

    let dispatcher = OutboxDispatcher::new(
        pool.clone(),
        OutboxTable::PaymentEvents,
        config.broker.status_topic.clone(),
        producer.clone(),
    )
    .with_tick_period(config.broker.dispatcher_tick_period)
    .with_lease_timeout_secs(config.broker.lease_timeout_secs);

    let dispatcher_shutdown = shutdown.clone();
    let dispatcher_handle = tokio::spawn(async move {
        dispatcher.run(dispatcher_shutdown).await;
    });

    let consume_pool = pool.clone();
    let consume_shutdown = shutdown.clone();
    let poll_timeout = config.broker.poll_timeout;
    let consumer_handle = tokio::spawn(async move {
        run_consume_loop(&consumer, poll_timeout, consume_shutdown, |message| {
            let pool = consume_pool.clone();
            async move {
                handler::handle_order_created(&pool, &message.payload)
                    .await
                    .map_err(|e| orderflow_broker::BrokerError::Send(e.to_string()))
            }
        })
        .await;
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    shutdown.cancel();

    let _ = consumer_handle.await;
    let _ = dispatcher_handle.await;
    let undelivered = producer.close().await;
    if undelivered > 0 {
        warn!(undelivered, "producer closed with undelivered messages");
    }

    info!("payment service stopped");
    Ok(())
}
