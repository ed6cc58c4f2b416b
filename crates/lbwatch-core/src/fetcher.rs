use std::future::Future;

use crate::error::FetchResult;
use crate::types::LoadBalancerSnapshot;

/// Source of load balancer snapshots.
///
/// One call is one logical poll: implementations that page through the
/// provider API must return either all pages or an error.
pub trait SnapshotFetcher: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = FetchResult<Vec<LoadBalancerSnapshot>>> + Send;
}
