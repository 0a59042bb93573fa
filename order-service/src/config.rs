//! Order service configuration.
//!
//! Loads configuration from environment variables with sensible
//! defaults, the same shape as the rest of this workspace's binaries.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Fatal start-up configuration error.
#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

/// Order service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api: ApiConfig,
    pub broker: BrokerSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Broker/dispatcher configuration.
#[derive(Debug, Clone)]
pub struct BrokerSettings {
    pub bootstrap_servers: String,
    pub orders_topic: String,
    pub dispatcher_tick_period: Duration,
    pub lease_timeout_secs: i64,
}

impl Config {
    /// Load configuration from the environment, falling back to a
    /// `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = require_env("DATABASE_URL")?;

        let api = ApiConfig {
            host: env::var("ORDER_SERVICE_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("ORDER_SERVICE_API_PORT", 8080)?,
        };

        let broker = BrokerSettings {
            bootstrap_servers: require_env("BROKER_BOOTSTRAP_SERVERS")?,
            orders_topic: env::var("ORDERS_TOPIC").unwrap_or_else(|_| "orders".to_string()),
            dispatcher_tick_period: Duration::from_secs(parse_env("DISPATCHER_TICK_PERIOD_SECS", 1)?),
            lease_timeout_secs: parse_env("OUTBOX_LEASE_TIMEOUT_SECS", 60)?,
        };

        Ok(Self {
            database_url,
            api,
            broker,
        })
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
