//! # Rotating File Logging
//!
//! Builds the process logger from the `[logger]` section: a rolling file
//! appender behind a non-blocking writer, one line per event in the form
//! `2026-10-16 09:30:00,123 - INFO - message`.
//!
//! The logger is owned by an explicit [`LoggingContext`]. Dropping it, or
//! calling [`LoggingContext::shutdown`], flushes lines still queued in the
//! background writer.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggerConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Errors raised while setting up the file logger
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory '{path}': {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("Failed to open rolling log file in '{path}': {reason}")]
    Appender { path: PathBuf, reason: String },

    #[error("Invalid logger setting '{field}': {value}")]
    InvalidSetting { field: &'static str, value: String },

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Log level names accepted in `[logger] level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parse a level name, accepting the `WARNING` and `CRITICAL` spellings
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Some(Self::Trace),
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" | "WARNING" => Some(Self::Warning),
            "ERROR" | "CRITICAL" | "FATAL" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// How often the log file rolls over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    pub rotation: Rotation,
    /// Units per rollover; the appender rolls on every unit boundary
    pub interval: u32,
}

impl RotationPolicy {
    /// Parse a rotation unit (`S`, `M`, `H`, `D`, `MIDNIGHT`, `W0`-`W6`, `NEVER`)
    ///
    /// Second-level rotation is coarsened to minutely and weekday rotation to
    /// daily, the finest units the rolling appender offers.
    pub fn parse(when: &str, interval: u32) -> Option<Self> {
        let unit = when.trim().to_ascii_uppercase();
        let rotation = match unit.as_str() {
            "S" | "M" => Rotation::MINUTELY,
            "H" => Rotation::HOURLY,
            "D" | "MIDNIGHT" => Rotation::DAILY,
            "NEVER" => Rotation::NEVER,
            weekday if weekday.len() == 2 && weekday.starts_with('W') => {
                match weekday.as_bytes()[1] {
                    b'0'..=b'6' => Rotation::DAILY,
                    _ => return None,
                }
            }
            _ => return None,
        };
        if interval == 0 {
            return None;
        }
        Some(Self { rotation, interval })
    }
}

/// Owner of the installed file logger
///
/// Keep it alive for the lifetime of the process; dropping it flushes and
/// stops the background writer.
pub struct LoggingContext {
    log_path: PathBuf,
    guard: WorkerGuard,
}

impl fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingContext")
            .field("log_path", &self.log_path)
            .finish_non_exhaustive()
    }
}

impl LoggingContext {
    /// Install the rotating file logger as the global subscriber
    pub fn init(config: &LoggerConfig) -> Result<Self, LoggingError> {
        let (context, subscriber) = Self::build(config)?;
        subscriber
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        if config.interval != 1 {
            tracing::warn!(
                "Log rotation interval {} not supported, rolling every unit instead",
                config.interval
            );
        }
        tracing::debug!(
            log_file = %context.log_path.display(),
            level = %config.level,
            when = %config.when,
            backup_count = config.backup_count,
            "File logging initialized"
        );

        Ok(context)
    }

    /// Build the context and its subscriber without installing the subscriber
    pub fn build(
        config: &LoggerConfig,
    ) -> Result<(Self, impl Subscriber + Send + Sync + 'static), LoggingError> {
        let (subscriber, guard) = build_subscriber(config)?;
        let context = Self {
            log_path: config.log_path(),
            guard,
        };
        Ok((context, subscriber))
    }

    /// Log file path before any rotation suffix
    ///
    /// Only the `NEVER` rotation writes to this exact path; the other
    /// rotations append the period to it, e.g. `app.log.2026-10-16`.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Flush pending lines and stop the background writer
    pub fn shutdown(self) {
        drop(self.guard);
    }
}

/// Build the subscriber without installing it
pub fn build_subscriber(
    config: &LoggerConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard), LoggingError> {
    let level = LogLevel::parse(&config.level).ok_or_else(|| LoggingError::InvalidSetting {
        field: "level",
        value: config.level.clone(),
    })?;
    let policy = RotationPolicy::parse(&config.when, config.interval).ok_or_else(|| {
        LoggingError::InvalidSetting {
            field: "when",
            value: config.when.clone(),
        }
    })?;

    if !config.log_dir.exists() {
        fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDirectory {
            path: config.log_dir.clone(),
            source,
        })?;
    }

    let mut builder = RollingFileAppender::builder()
        .rotation(policy.rotation)
        .filename_prefix(config.file.clone());
    if config.backup_count > 0 {
        // Rotated backups plus the active file
        builder = builder.max_log_files(config.backup_count + 1);
    }
    let appender = builder
        .build(&config.log_dir)
        .map_err(|e| LoggingError::Appender {
            path: config.log_dir.clone(),
            reason: e.to_string(),
        })?;

    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::new(level.as_level().as_str().to_ascii_lowercase());

    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat::default())
            .with_writer(file_writer)
            .with_ansi(false)
            .with_filter(filter),
    );

    Ok((subscriber, guard))
}

/// `timestamp - LEVEL - message` event format
#[derive(Debug, Clone)]
pub struct LineFormat {
    timer: ChronoLocal,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            timer: ChronoLocal::new(TIMESTAMP_FORMAT.to_string()),
        }
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " - {} - ", level_name(event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
