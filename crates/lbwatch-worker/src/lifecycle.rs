//! Ordered shutdown: refresh worker first, exposition server second.

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::LifecycleError;
use crate::worker::{WorkerExit, WorkerHandle};

/// Bounds for the shutdown sequence.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownConfig {
    /// How long to wait for the worker's acknowledgment after cancelling.
    pub ack_timeout: Duration,
    /// How long the server may take to finish in-flight requests.
    pub drain_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_secs(10),
            drain_timeout: Duration::from_secs(5),
        }
    }
}

/// Wait for `shutdown_signal` (or the worker stopping on its own), then
/// stop the worker and afterwards the server.
///
/// `stop_server` is only invoked once the worker has acknowledged (or the
/// acknowledgment timed out and the worker was aborted). Returns an error
/// for every outcome that should end the process with a non-zero status.
pub async fn coordinate<Sig, Stop, Fut>(
    mut worker: WorkerHandle,
    shutdown_signal: Sig,
    stop_server: Stop,
    config: ShutdownConfig,
) -> Result<(), LifecycleError>
where
    Sig: Future<Output = ()>,
    Stop: FnOnce() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let early_exit = tokio::select! {
        _ = shutdown_signal => {
            info!("shutdown signal received");
            None
        }
        exit = worker.stopped() => Some(exit),
    };

    let worker_result = match early_exit {
        Some(exit) => exit,
        None => {
            worker.cancel();
            match tokio::time::timeout(config.ack_timeout, worker.stopped()).await {
                Ok(exit) => exit,
                Err(_) => {
                    worker.abort();
                    Err(LifecycleError::AckTimeout(config.ack_timeout))
                }
            }
        }
    };

    let worker_result = match worker_result {
        Ok(WorkerExit::Cancelled) => {
            info!("refresh worker stopped");
            Ok(())
        }
        Ok(WorkerExit::Fatal(e)) => Err(LifecycleError::WorkerFatal(e)),
        Err(e) => Err(e),
    };
    if let Err(e) = &worker_result {
        error!(error = %e, "refresh worker did not stop cleanly");
    }

    info!(drain_timeout_ms = config.drain_timeout.as_millis() as u64, "stopping exposition server");
    let server_result = match tokio::time::timeout(config.drain_timeout, stop_server()).await {
        Ok(Ok(())) => {
            info!("exposition server stopped");
            Ok(())
        }
        Ok(Err(e)) => Err(LifecycleError::Server(e)),
        Err(_) => Err(LifecycleError::DrainTimeout(config.drain_timeout)),
    };
    if let Err(e) = &server_result {
        warn!(error = %e, "exposition server did not stop cleanly");
    }

    worker_result.and(server_result)
}
