//! # Database Operations
//!
//! MySQL access for the exporter: a connection seam with fixed-delay retry and
//! the single licensed-projects query.
//!
//! ## Key Components
//!
//! - [`connection`] - `Connector` seam, MySQL connector and `connect_with_retry`
//! - [`projects`] - `ProjectRecord` and the query that fetches them
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use project_exporter::config::ConfigManager;
//! use project_exporter::database::{connect_with_retry, MySqlConnector, ProjectSource, RetryPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load_from_file("config.ini")?;
//! let connector = MySqlConnector::from_config(&manager.config().mysql);
//! let policy = RetryPolicy::from_config(&manager.config().mysql);
//!
//! let mut connection = connect_with_retry(&connector, &policy).await?;
//! let projects = connection.fetch_licensed_projects().await?;
//! connection.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod projects;

pub use connection::{connect_with_retry, Connector, MySqlConnector, RetryPolicy};
pub use projects::{ProjectRecord, ProjectSource, LICENSED_PROJECTS_QUERY};
