//! lbwatch-metrics — gauges for load balancer state.
//!
//! Turns fetched load balancer snapshots into labeled gauge samples,
//! stores the latest value of every series in a shared registry, and
//! renders the registry in the Prometheus text exposition format.
//!
//! # Architecture
//!
//! ```text
//! translate(Vec<LoadBalancerSnapshot>) → Vec<MetricSample>
//!
//! Registry
//!   ├── register(GaugeDesc)   ← once at startup
//!   ├── apply(samples)        ← refresh worker, once per poll
//!   └── snapshot()            → Vec<GaugeFamily>
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```
//!
//! Series that stop appearing in the provider's answer are not removed;
//! they keep their last value until the process restarts.

pub mod prometheus;
pub mod registry;
pub mod translate;

pub use prometheus::render_prometheus;
pub use registry::{ApplyReport, GaugeDesc, GaugeFamily, MetricSample, Registry, RegistryError, Series};
pub use translate::{register_gauges, translate};
