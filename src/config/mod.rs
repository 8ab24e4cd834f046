//! # Exporter Configuration System
//!
//! Typed view over the exporter's INI file. Each INI section maps onto one
//! struct; optional keys carry serde defaults, required keys have none so a
//! missing key fails deserialization.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use project_exporter::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load_from_file("config.ini")?;
//!
//! let interval = manager.config().schedule.interval();
//! let output = &manager.config().output.yaml_file_path;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::{LogLevel, RotationPolicy};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring config.ini
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExporterConfig {
    /// Rotating file logger settings
    #[serde(default)]
    pub logger: LoggerConfig,

    /// MySQL connection settings
    pub mysql: DatabaseConfig,

    /// Output artifact settings
    pub output: OutputConfig,

    /// Scheduling settings
    pub schedule: ScheduleConfig,
}

/// `[logger]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Rotation unit: S, M, H, D, MIDNIGHT, W0-W6 or NEVER
    #[serde(default = "default_rotation_when")]
    pub when: String,
    #[serde(default = "default_rotation_interval")]
    pub interval: u32,
    /// Number of rotated files kept; 0 keeps everything
    #[serde(default = "default_backup_count")]
    pub backup_count: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: default_log_dir(),
            file: default_log_file(),
            when: default_rotation_when(),
            interval: default_rotation_interval(),
            backup_count: default_backup_count(),
        }
    }
}

impl LoggerConfig {
    /// `log_dir/file`, the name prefix of the rotating log
    ///
    /// Unless `when` is `NEVER` the appender adds a date suffix, so lines
    /// land in files such as `logs/app.log.2026-10-16`.
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.file)
    }
}

/// `[mysql]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_mysql_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    pub collation: String,
    /// Connection attempts per job run
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

impl DatabaseConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    /// `mysql://user@host:port/database`, password omitted
    pub fn display_target(&self) -> String {
        format!(
            "mysql://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

/// `[output]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub yaml_file_path: PathBuf,
}

/// `[schedule]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    pub interval_minutes: u64,
    /// How often the scheduler checks whether a run is due
    #[serde(default = "default_check_interval_seconds")]
    pub check_interval_seconds: u64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file() -> String {
    "app.log".to_string()
}

fn default_rotation_when() -> String {
    "D".to_string()
}

fn default_rotation_interval() -> u32 {
    1
}

fn default_backup_count() -> usize {
    7
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_connect_retries() -> u32 {
    3
}

fn default_retry_delay_seconds() -> u64 {
    5
}

fn default_check_interval_seconds() -> u64 {
    1
}

impl ExporterConfig {
    /// Validate semantic constraints that deserialization cannot express
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("host", &self.mysql.host),
            ("user", &self.mysql.user),
            ("database", &self.mysql.database),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(field, "mysql"));
            }
        }

        if self.mysql.connect_retries == 0 {
            return Err(ConfigurationError::invalid_value(
                "mysql.connect_retries",
                "0",
                "at least one connection attempt is required",
            ));
        }

        if self.output.yaml_file_path.as_os_str().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "yaml_file_path",
                "output",
            ));
        }

        if self.schedule.interval_minutes == 0 {
            return Err(ConfigurationError::invalid_value(
                "schedule.interval_minutes",
                "0",
                "interval must be greater than 0",
            ));
        }

        if self.schedule.check_interval_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "schedule.check_interval_seconds",
                "0",
                "check interval must be greater than 0",
            ));
        }

        if self.logger.file.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field("file", "logger"));
        }

        LogLevel::parse(&self.logger.level).ok_or_else(|| {
            ConfigurationError::invalid_value(
                "logger.level",
                self.logger.level.clone(),
                "expected one of TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL",
            )
        })?;

        RotationPolicy::parse(&self.logger.when, self.logger.interval).ok_or_else(|| {
            ConfigurationError::invalid_value(
                "logger.when",
                self.logger.when.clone(),
                "expected one of S, M, H, D, MIDNIGHT, W0-W6, NEVER",
            )
        })?;

        Ok(())
    }
}
