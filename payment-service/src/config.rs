//! Payment service configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub broker: BrokerSettings,
}

#[derive(Debug, Clone)]
pub struct BrokerSettings {
    pub bootstrap_servers: String,
    pub group_id: String,
    pub orders_topic: String,
    pub status_topic: String,
    pub poll_timeout: Duration,
    pub dispatcher_tick_period: Duration,
    pub lease_timeout_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = require_env("DATABASE_URL")?;

        let broker = BrokerSettings {
            bootstrap_servers: require_env("BROKER_BOOTSTRAP_SERVERS")?,
            group_id: env::var("PAYMENT_CONSUMER_GROUP_ID").unwrap_or_else(|_| "payment-service".to_string()),
            orders_topic: env::var("ORDERS_TOPIC").unwrap_or_else(|_| "orders".to_string()),
            status_topic: env::var("STATUS_TOPIC").unwrap_or_else(|_| "status".to_string()),
            poll_timeout: Duration::from_millis(parse_env("BROKER_POLL_TIMEOUT_MS", 500)?),
            dispatcher_tick_period: Duration::from_secs(parse_env("DISPATCHER_TICK_PERIOD_SECS", 1)?),
            lease_timeout_secs: parse_env("OUTBOX_LEASE_TIMEOUT_SECS", 60)?,
        };

        Ok(Self { database_url, broker })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError(format!("missing required environment variable {key}")))
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|_| ConfigError(format!("invalid value for {key}: {val}"))),
        Err(_) => Ok(default),
    }
}
