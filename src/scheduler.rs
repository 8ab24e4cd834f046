//! # Scheduler Loop
//!
//! Runs a [`Job`] once immediately, then again whenever `interval` has passed
//! since the previous run finished. Between checks it sleeps for
//! `check_interval`. The loop ends when the shutdown future resolves; a run
//! already in progress is allowed to finish, and no new run starts afterwards.

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info};

use crate::job::{Job, JobOutcome};

/// Counters collected over the lifetime of a scheduler loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerReport {
    pub runs: u64,
    pub exported: u64,
    pub abandoned: u64,
    pub panicked: u64,
}

impl SchedulerReport {
    fn record(&mut self, outcome: Option<&JobOutcome>) {
        self.runs += 1;
        match outcome {
            Some(outcome) if outcome.is_exported() => self.exported += 1,
            Some(_) => self.abandoned += 1,
            None => self.panicked += 1,
        }
    }
}

#[derive(Debug)]
pub struct Scheduler<J> {
    job: J,
    interval: Duration,
    check_interval: Duration,
}

impl<J: Job> Scheduler<J> {
    pub fn new(job: J, interval: Duration, check_interval: Duration) -> Self {
        Self {
            job,
            interval,
            check_interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive the job until `shutdown` resolves
    pub async fn run_until<F>(&self, shutdown: F) -> SchedulerReport
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut report = SchedulerReport::default();

        self.run_job(&mut report).await;
        let mut next_run = Instant::now() + self.interval;
        info!(
            "Export will run again every {} minute(s)",
            self.interval.as_secs() / 60
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.check_interval) => {}
            }

            if Instant::now() >= next_run {
                self.run_job(&mut report).await;
                next_run = Instant::now() + self.interval;
            }
        }

        info!(
            runs = report.runs,
            exported = report.exported,
            abandoned = report.abandoned,
            panicked = report.panicked,
            "Scheduler stopped"
        );
        report
    }

    async fn run_job(&self, report: &mut SchedulerReport) {
        match AssertUnwindSafe(self.job.run()).catch_unwind().await {
            Ok(outcome) => report.record(Some(&outcome)),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                error!("Unexpected error during scheduled run: {message}");
                report.record(None);
            }
        }
    }
}
