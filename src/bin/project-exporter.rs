//! # Project Exporter
//!
//! Exports licensed project metadata from MySQL to a YAML file, once at start
//! and then every `[schedule] interval_minutes`, until SIGTERM or Ctrl+C.
//!
//! ## Usage
//!
//! ```bash
//! project-exporter --config /etc/project-exporter/config.ini
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

use project_exporter::config::ConfigManager;
use project_exporter::database::{MySqlConnector, RetryPolicy};
use project_exporter::job::ExportJob;
use project_exporter::logging::LoggingContext;
use project_exporter::scheduler::Scheduler;
use project_exporter::shutdown::{run_until_terminated, shutdown_signal};

#[derive(Parser)]
#[command(name = "project-exporter")]
#[command(about = "Periodically export licensed projects from MySQL to YAML")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the INI configuration file
    #[arg(short, long, env = "EXPORTER_CONFIG", default_value = "config.ini")]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let (manager, logging) = match start(&cli) {
        Ok(started) => started,
        Err(e) => {
            report_startup_error(&e);
            process::exit(1);
        }
    };
    let config = manager.config();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %manager.config_path().display(),
        "Starting project exporter"
    );

    let shutdown = shutdown_signal();

    let job = ExportJob::new(
        MySqlConnector::from_config(&config.mysql),
        RetryPolicy::from_config(&config.mysql),
        config.output.yaml_file_path.clone(),
    );
    let scheduler = Scheduler::new(
        job,
        config.schedule.interval(),
        config.schedule.check_interval(),
    );

    run_until_terminated(&scheduler, shutdown, logging).await;
}

fn start(cli: &Cli) -> anyhow::Result<(ConfigManager, LoggingContext)> {
    let manager = ConfigManager::load_from_file(&cli.config)
        .with_context(|| format!("Config file error in {}", cli.config.display()))?;
    let logging = LoggingContext::init(&manager.config().logger)
        .context("Failed to initialize file logging")?;
    Ok((manager, logging))
}

/// Startup failures happen before the file logger exists, so they go to stderr
fn report_startup_error(e: &anyhow::Error) {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        error!("{e:#}");
    });
}
