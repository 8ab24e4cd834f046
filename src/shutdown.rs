use std::future::Future;
use tokio::signal;
use tracing::{error, info};

use crate::job::Job;
use crate::logging::LoggingContext;
use crate::scheduler::{Scheduler, SchedulerReport};

/// Drive `scheduler` until `shutdown` resolves, then log the shutdown and
/// flush the file logger
pub async fn run_until_terminated<J, F>(
    scheduler: &Scheduler<J>,
    shutdown: F,
    logging: LoggingContext,
) -> SchedulerReport
where
    J: Job,
    F: Future<Output = ()>,
{
    let report = scheduler.run_until(shutdown).await;
    info!("Process terminated gracefully");
    logging.shutdown();
    report
}

/// Install the SIGTERM and Ctrl+C handlers and return a future that resolves
/// on the first of them
///
/// Handlers are registered when this is called, not when the future is first
/// polled, so a signal delivered while a run is in progress is still observed.
/// Must be called from within a tokio runtime. If a handler cannot be
/// installed that branch never resolves.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    use signal::unix::{signal, SignalKind};

    let install = |kind: SignalKind, name: &str| match signal(kind) {
        Ok(stream) => Some(stream),
        Err(e) => {
            error!("Failed to install {name} handler: {e}");
            None
        }
    };
    let interrupt = install(SignalKind::interrupt(), "Ctrl+C");
    let terminate = install(SignalKind::terminate(), "SIGTERM");

    async move {
        let ctrl_c = async {
            match interrupt {
                Some(mut stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        let terminate = async {
            match terminate {
                Some(mut stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C");
            },
            _ = terminate => {
                info!("Received SIGTERM");
            },
        }
    }
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = ()> {
    async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C");
    }
}
