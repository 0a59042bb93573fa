//! Notification service configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub broker: BrokerSettings,
    /// Optional TTL applied to every record written to the store. `None`
    /// means no expiry, matching the source store's zero-TTL default.
    pub notification_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct BrokerSettings {
    pub bootstrap_servers: String,
    pub group_id: String,
    pub status_topic: String,
    pub poll_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let redis_url = require_env("REDIS_URL")?;

        let broker = BrokerSettings {
            bootstrap_servers: require_env("BROKER_BOOTSTRAP_SERVERS")?,
            group_id: env::var("NOTIFICATION_CONSUMER_GROUP_ID")
                .unwrap_or_else(|_| "notification-service".to_string()),
            status_topic: env::var("STATUS_TOPIC").unwrap_or_else(|_| "status".to_string()),
            poll_timeout: Duration::from_millis(parse_env("BROKER_POLL_TIMEOUT_MS", 500)?),
        };

        let notification_ttl_secs = match env::var("NOTIFICATION_TTL_SECS") {
            Ok(val) if val.is_empty() => None,
            Ok(val) => Some(
                val.parse()
                    .map_err(|_| ConfigError(format!("invalid value for NOTIFICATION_TTL_SECS: {val}")))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            redis_url,
            broker,
            notification_ttl_secs,
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
