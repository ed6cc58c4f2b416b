//! lbwatch-core — shared model for the lbwatch exporter.
//!
//! Holds the per-poll snapshot types that the fetcher produces and the
//! translator consumes, the typed fetch error, and the `SnapshotFetcher`
//! trait that separates the refresh worker from the provider client.
//!
//! # Architecture
//!
//! ```text
//! SnapshotFetcher::fetch()
//!   └── Vec<LoadBalancerSnapshot>
//!         ├── targets: Vec<Target>
//!         │     └── health: Vec<HealthEntry>
//!         ├── services: Vec<Service>
//!         └── ingoing / outgoing traffic (bytes)
//! ```

pub mod duration;
pub mod error;
pub mod fetcher;
pub mod types;

pub use duration::parse_duration;
pub use error::{FetchError, FetchResult};
pub use fetcher::SnapshotFetcher;
pub use types::*;
