#![allow(clippy::doc_markdown)] // Allow technical terms like MySQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Project Exporter
//!
//! Periodic export of licensed project metadata from MySQL to a YAML file.
//!
//! ## Overview
//!
//! On start the exporter runs one export immediately, then repeats it on a
//! fixed interval until it receives SIGTERM or Ctrl+C. Each run opens its own
//! database connection (retrying a fixed number of times), fetches every
//! project with a license key and overwrites the output file. Failed runs are
//! logged and the next tick tries again.
//!
//! ## Module Organization
//!
//! - [`config`] - INI configuration loading and validation
//! - [`logging`] - Rotating file logger and its owning context
//! - [`error`] - Error taxonomy and database error classification
//! - [`database`] - Connector seam, retry and the project query
//! - [`export`] - YAML rendering and file output
//! - [`job`] - A single fetch-and-export run
//! - [`scheduler`] - Interval loop driving the job
//! - [`shutdown`] - Termination signal handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use project_exporter::config::ConfigManager;
//! use project_exporter::database::{MySqlConnector, RetryPolicy};
//! use project_exporter::job::ExportJob;
//! use project_exporter::scheduler::Scheduler;
//! use project_exporter::shutdown::shutdown_signal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load_from_file("config.ini")?;
//! let config = manager.config();
//!
//! let job = ExportJob::new(
//!     MySqlConnector::from_config(&config.mysql),
//!     RetryPolicy::from_config(&config.mysql),
//!     config.output.yaml_file_path.clone(),
//! );
//! let scheduler = Scheduler::new(job, config.schedule.interval(), config.schedule.check_interval());
//! scheduler.run_until(shutdown_signal()).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod job;
pub mod logging;
pub mod scheduler;
pub mod shutdown;

pub use config::{ConfigManager, ConfigurationError, ExporterConfig};
pub use database::{ProjectRecord, RetryPolicy};
pub use error::{DatabaseErrorKind, ExporterError, Result};
pub use job::{ExportJob, Job, JobOutcome, JobStage};
pub use logging::LoggingContext;
pub use scheduler::{Scheduler, SchedulerReport};
