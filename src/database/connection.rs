use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection as _;
use std::time::Duration;
use tracing::{error, info, warn};

use super::projects::ProjectSource;
use crate::config::DatabaseConfig;
use crate::error::{ExporterError, Result};

/// Opens one database connection per call
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: ProjectSource;

    async fn connect(&self) -> std::result::Result<Self::Connection, sqlx::Error>;

    /// Human readable endpoint for log lines, never includes credentials
    fn target(&self) -> String;
}

/// Fixed-count, fixed-delay retry for opening connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.connect_retries, config.retry_delay())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Connect, retrying every failure identically until the policy is exhausted
///
/// The delay is only slept between attempts, never after the last one.
pub async fn connect_with_retry<C: Connector>(
    connector: &C,
    policy: &RetryPolicy,
) -> Result<C::Connection> {
    let mut last_error = String::new();

    for attempt in 1..=policy.attempts {
        match connector.connect().await {
            Ok(connection) => {
                info!(target_db = %connector.target(), attempt, "Database connection established");
                return Ok(connection);
            }
            Err(e) => {
                warn!(
                    target_db = %connector.target(),
                    attempt,
                    max_attempts = policy.attempts,
                    "Database connection attempt {attempt} failed: {e}"
                );
                last_error = e.to_string();
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    error!(
        target_db = %connector.target(),
        attempts = policy.attempts,
        "Database connection failed"
    );
    Err(ExporterError::ConnectionExhausted {
        attempts: policy.attempts,
        last_error,
    })
}

/// MySQL connector built from the `[mysql]` section
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    target: String,
}

impl MySqlConnector {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset(&config.charset)
            .collation(&config.collation);

        Self {
            options,
            target: config.display_target(),
        }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = MySqlConnection;

    async fn connect(&self) -> std::result::Result<MySqlConnection, sqlx::Error> {
        MySqlConnection::connect_with(&self.options).await
    }

    fn target(&self) -> String {
        self.target.clone()
    }
}
