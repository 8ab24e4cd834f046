//! Error types for the exporter.
//!
//! Configuration errors are fatal. Everything else is caught by the export job,
//! logged with its classification and the run is abandoned.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Coarse classification of database failures, used for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    /// The server rejected the statement (syntax, unknown column, permissions)
    Sql,
    /// Transport level failure: I/O, TLS, protocol or a closed connection
    Interface,
    /// Anything else reported by the driver
    General,
}

impl DatabaseErrorKind {
    pub fn classify(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(_) => Self::Sql,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Interface,
            _ => Self::General,
        }
    }
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql => write!(f, "SQL error"),
            Self::Interface => write!(f, "database interface error"),
            Self::General => write!(f, "general database error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Database connection failed after {attempts} attempt(s): {last_error}")]
    ConnectionExhausted { attempts: u32, last_error: String },

    #[error("{kind}: {message}")]
    Database {
        kind: DatabaseErrorKind,
        message: String,
    },

    #[error("YAML serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Failed to write output file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<sqlx::Error> for ExporterError {
    fn from(err: sqlx::Error) -> Self {
        ExporterError::Database {
            kind: DatabaseErrorKind::classify(&err),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
