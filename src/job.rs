//! # Fetch-and-Export Job
//!
//! One best-effort export: connect with retry, fetch the licensed projects,
//! overwrite the YAML file. Failures are logged and reported through
//! [`JobOutcome`]; nothing is raised to the caller. A connection that was
//! opened is always closed before the job returns.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::database::{connect_with_retry, Connector, ProjectSource, RetryPolicy};
use crate::error::ExporterError;
use crate::export;

/// Step of a run at which it was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Connect,
    Fetch,
    Export,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Fetch => write!(f, "fetch"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// Result of a single run
#[derive(Debug)]
pub enum JobOutcome {
    Exported { path: PathBuf, records: usize },
    Abandoned { stage: JobStage, error: ExporterError },
}

impl JobOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self, Self::Exported { .. })
    }
}

/// Unit of work driven by the scheduler
#[async_trait]
pub trait Job: Send + Sync {
    async fn run(&self) -> JobOutcome;
}

/// Exports licensed projects from the database to a YAML file
#[derive(Debug)]
pub struct ExportJob<C> {
    connector: C,
    retry_policy: RetryPolicy,
    output_path: PathBuf,
}

impl<C: Connector> ExportJob<C> {
    pub fn new(connector: C, retry_policy: RetryPolicy, output_path: impl Into<PathBuf>) -> Self {
        Self {
            connector,
            retry_policy,
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    async fn export_from(&self, connection: &mut C::Connection) -> JobOutcome {
        let records = match connection.fetch_licensed_projects().await {
            Ok(records) => records,
            Err(e) => {
                let error = ExporterError::from(e);
                error!("Project query failed, abandoning export: {error}");
                return JobOutcome::Abandoned {
                    stage: JobStage::Fetch,
                    error,
                };
            }
        };

        match export::write_yaml(&self.output_path, &records) {
            Ok(()) => {
                info!(
                    records = records.len(),
                    "Project metadata saved to YAML file: {}",
                    self.output_path.display()
                );
                JobOutcome::Exported {
                    path: self.output_path.clone(),
                    records: records.len(),
                }
            }
            Err(error) => {
                error!("YAML export failed: {error}");
                JobOutcome::Abandoned {
                    stage: JobStage::Export,
                    error,
                }
            }
        }
    }
}

#[async_trait]
impl<C: Connector> Job for ExportJob<C> {
    async fn run(&self) -> JobOutcome {
        let started = Instant::now();

        let mut connection = match connect_with_retry(&self.connector, &self.retry_policy).await {
            Ok(connection) => connection,
            Err(error) => {
                error!("Could not connect to the database, abandoning export: {error}");
                return JobOutcome::Abandoned {
                    stage: JobStage::Connect,
                    error,
                };
            }
        };

        let outcome = self.export_from(&mut connection).await;

        match connection.close().await {
            Ok(()) => info!("Database connection closed"),
            Err(e) => warn!("Database connection did not close cleanly: {e}"),
        }

        info!(
            exported = outcome.is_exported(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Export run finished"
        );
        outcome
    }
}
