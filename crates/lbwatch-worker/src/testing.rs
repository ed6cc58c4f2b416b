use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lbwatch_core::{
    FetchResult, HealthEntry, HealthStatus, LoadBalancerSnapshot, SnapshotFetcher, Target,
};

/// Fetcher that replays a fixed list of results, then returns empty lists.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    script: Arc<Mutex<VecDeque<FetchResult<Vec<LoadBalancerSnapshot>>>>>,
    started: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    delay: Duration,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<FetchResult<Vec<LoadBalancerSnapshot>>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            ..Default::default()
        }
    }

    /// Make every fetch take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl SnapshotFetcher for ScriptedFetcher {
    async fn fetch(&self) -> FetchResult<Vec<LoadBalancerSnapshot>> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()));
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// One load balancer with a single healthy target on port 80.
pub fn lb(id: u64, ingoing_traffic: u64) -> LoadBalancerSnapshot {
    LoadBalancerSnapshot {
        id,
        name: format!("lb{id}"),
        targets: vec![Target {
            identifier: "10.0.0.5".to_string(),
            health: vec![HealthEntry {
                listen_port: 80,
                status: HealthStatus::Healthy,
            }],
        }],
        services: Vec::new(),
        ingoing_traffic,
        outgoing_traffic: 0,
    }
}
