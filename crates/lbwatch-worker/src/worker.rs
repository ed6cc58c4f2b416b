//! Refresh worker — background task that polls the provider and publishes
//! the result as gauges.
//!
//! One poll is fetch → translate → registry write, run to completion before
//! the next wait starts, so cycles never overlap. Cancellation is observed
//! only while waiting: a fetch already in flight finishes and its samples
//! are published before the worker stops.

use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use lbwatch_core::{FetchError, FetchResult, SnapshotFetcher};
use lbwatch_metrics::{translate, Registry};

use crate::backoff::Backoff;
use crate::error::LifecycleError;

/// Cadence settings for the refresh worker.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    /// Wait between the end of one poll and the start of the next.
    pub interval: Duration,
    /// Longest wait after repeated transient failures.
    pub max_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
        }
    }
}

/// Why the worker stopped. Sent once through the acknowledgment channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// Cancellation was requested.
    Cancelled,
    /// A permanent fetch error ended the loop.
    Fatal(FetchError),
}

/// Polls a fetcher and writes the translated samples to a registry.
pub struct RefreshWorker<F> {
    fetcher: F,
    registry: Registry,
    config: WorkerConfig,
}

impl<F: SnapshotFetcher> RefreshWorker<F> {
    pub fn new(fetcher: F, registry: Registry, config: WorkerConfig) -> Self {
        Self {
            fetcher,
            registry,
            config,
        }
    }

    /// Run a single poll cycle. Returns the number of samples written.
    pub async fn poll_once(&self) -> FetchResult<usize> {
        let snapshots = self.fetcher.fetch().await?;
        let loadbalancers = snapshots.len();

        let samples = translate(snapshots);
        let report = self.registry.apply(samples).await;
        for rejected in &report.rejected {
            warn!(error = %rejected, "sample rejected by registry");
        }

        let series = self.registry.series_count().await;
        debug!(
            loadbalancers,
            samples = report.written,
            series,
            "registry refreshed"
        );
        Ok(report.written)
    }

    /// Poll until cancelled or a permanent error occurs.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) -> WorkerExit {
        let mut backoff = Backoff::new(self.config.interval, self.config.max_backoff);
        info!(
            interval_ms = self.config.interval.as_millis() as u64,
            "refresh worker started"
        );

        loop {
            if *cancel.borrow_and_update() {
                break;
            }

            tokio::select! {
                biased;
                // Only `true` is ever sent; a dropped sender also stops the loop.
                _ = cancel.changed() => break,
                _ = tokio::time::sleep(backoff.next_interval()) => {
                    match self.poll_once().await {
                        Ok(_) => backoff.record_success(),
                        Err(e) if e.is_transient() => {
                            backoff.record_failure();
                            warn!(
                                error = %e,
                                failures = backoff.consecutive_failures(),
                                retry_in_ms = backoff.next_interval().as_millis() as u64,
                                "fetch failed, keeping last known values"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "fetch failed permanently, refresh worker stopping");
                            return WorkerExit::Fatal(e);
                        }
                    }
                }
            }
        }

        info!("refresh worker cancelled");
        WorkerExit::Cancelled
    }

    /// Spawn the worker on the tokio runtime.
    pub fn spawn(self) -> WorkerHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (done_tx, done_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let exit = self.run(cancel_rx).await;
            let _ = done_tx.send(exit);
        });

        WorkerHandle {
            cancel: cancel_tx,
            done: Some(done_rx),
            task,
        }
    }
}

/// Control side of a spawned worker.
pub struct WorkerHandle {
    cancel: watch::Sender<bool>,
    done: Option<oneshot::Receiver<WorkerExit>>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Ask the worker to stop. It finishes any in-flight poll first.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Wait for the worker's acknowledgment. Resolves at most once.
    pub async fn stopped(&mut self) -> Result<WorkerExit, LifecycleError> {
        let done = self.done.as_mut().ok_or(LifecycleError::AlreadyStopped)?;
        let result = done.await.map_err(|_| LifecycleError::WorkerLost);
        self.done = None;
        result
    }

    /// Kill the worker task without waiting for it.
    pub fn abort(&self) {
        self.task.abort();
    }
}
