//! lbwatch-hcloud — Hetzner Cloud control plane client.
//!
//! Implements `SnapshotFetcher` on top of the `GET /load_balancers` API,
//! following pagination until the last page so one `fetch()` returns the
//! complete list.

pub mod client;
mod wire;

pub use client::{HcloudClient, HcloudConfig, DEFAULT_ENDPOINT};
