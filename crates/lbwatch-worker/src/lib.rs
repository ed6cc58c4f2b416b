//! lbwatch-worker — the refresh loop and its shutdown coordination.
//!
//! The `RefreshWorker` polls a `SnapshotFetcher` on a fixed cadence,
//! translates each answer into gauge samples, and writes them to the shared
//! `Registry`. The coordinator stops it on a termination signal and only
//! then stops the exposition server.
//!
//! # Architecture
//!
//! ```text
//! coordinate()
//!   ├── wait for signal (or worker exiting on its own)
//!   ├── WorkerHandle::cancel() → watch channel
//!   ├── WorkerHandle::stopped() ← oneshot ack, bounded by ack_timeout
//!   └── stop_server() bounded by drain_timeout
//!
//! RefreshWorker::run()
//!   loop { sleep(Backoff::next_interval) → fetch → translate → apply }
//! ```
//!
//! # Error policy
//!
//! Transient fetch errors keep the last published values and back off
//! exponentially (interval → 2× per failure, capped). A permanent error
//! stops the worker with `WorkerExit::Fatal`.

pub mod backoff;
pub mod error;
pub mod lifecycle;
pub mod worker;

#[cfg(test)]
mod testing;

pub use backoff::Backoff;
pub use error::LifecycleError;
pub use lifecycle::{coordinate, ShutdownConfig};
pub use worker::{RefreshWorker, WorkerConfig, WorkerExit, WorkerHandle};
