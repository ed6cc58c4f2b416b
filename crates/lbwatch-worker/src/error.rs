//! Error types for worker and shutdown coordination.

use std::time::Duration;

use lbwatch_core::FetchError;
use thiserror::Error;

/// Ways the process lifecycle can end badly.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("refresh worker stopped on a permanent fetch error: {0}")]
    WorkerFatal(FetchError),

    #[error("refresh worker did not acknowledge shutdown within {0:?}")]
    AckTimeout(Duration),

    #[error("refresh worker exited without acknowledging shutdown")]
    WorkerLost,

    #[error("refresh worker acknowledgment was already observed")]
    AlreadyStopped,

    #[error("exposition server did not drain within {0:?}")]
    DrainTimeout(Duration),

    #[error("exposition server failed: {0}")]
    Server(#[from] std::io::Error),
}
