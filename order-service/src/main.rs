//! Order service daemon.
//!
//! Serves the order core's HTTP surface and runs the `order_events`
//! outbox dispatcher side by side, sharing one connection pool.
//!
//! # Environment variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `BROKER_BOOTSTRAP_SERVERS`: Kafka bootstrap servers (required)
//! - `ORDER_SERVICE_API_HOST` / `ORDER_SERVICE_API_PORT`: HTTP bind address
//! - `ORDERS_TOPIC`: topic the outbox dispatcher publishes to (default: orders)
//! - `DISPATCHER_TICK_PERIOD_SECS`, `OUTBOX_LEASE_TIMEOUT_SECS`

use order_service::{api, config::Config};
use orderflow_broker::{KafkaProducer, ProducerConfig};
use orderflow_outbox::{OutboxDispatcher, OutboxTable};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("order_service=info".parse()?))
        .init();

    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_host = %config.api.host,
        api_port = config.api.port,
        "order service starting"
    );

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    orderflow_db::migrate(&pool).await?;

    let mut producer_config = ProducerConfig::new(config.broker.bootstrap_servers.clone());
    producer_config.retries = 10;
    let producer = Arc::new(KafkaProducer::new(producer_config)?);

    let shutdown = CancellationToken::new();

    let dispatcher = OutboxDispatcher::new(
        pool.clone(),
        OutboxTable::OrderEvents,
        config.broker.orders_topic.clone(),
        producer.clone(),
    )
    .with_tick_period(config.broker.dispatcher_tick_period)
    .with_lease_timeout_secs(config.broker.lease_timeout_secs);

    let dispatcher_shutdown = shutdown.clone();
    let dispatcher_handle = tokio::spawn(async move {
        dispatcher.run(dispatcher_shutdown).await;
    });

    let router = api::router(pool);
    let addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "order service listening");

    let server_shutdown = shutdown.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        server_shutdown.cancelled().await;
    });

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "http server exited with an error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            shutdown.cancel();
        }
    }

    shutdown.cancel();
    let _ = dispatcher_handle.await;
    let undelivered = producer.close().await;
    if undelivered > 0 {
        tracing::warn!(undelivered, "producer closed with undelivered messages");
    }

    info!("order service stopped");
    Ok(())
}
