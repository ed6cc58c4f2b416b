//! Response schema of the `load_balancers` endpoint.
//!
//! Only the fields the exporter reads are modeled; everything else in the
//! provider's payload is ignored.

use serde::Deserialize;

use lbwatch_core::{HealthEntry, HealthStatus, LoadBalancerSnapshot, Service, Target};

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    pub load_balancers: Vec<ApiLoadBalancer>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl ListResponse {
    pub fn next_page(&self) -> Option<u64> {
        self.meta
            .as_ref()
            .and_then(|m| m.pagination.as_ref())
            .and_then(|p| p.next_page)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub next_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiLoadBalancer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub targets: Vec<ApiTarget>,
    #[serde(default)]
    pub services: Vec<ApiService>,
    #[serde(default)]
    pub ingoing_traffic: Option<u64>,
    #[serde(default)]
    pub outgoing_traffic: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTarget {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub server: Option<ApiServerRef>,
    #[serde(default)]
    pub label_selector: Option<ApiLabelSelector>,
    #[serde(default)]
    pub ip: Option<ApiIp>,
    #[serde(default)]
    pub health_status: Vec<ApiHealthStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiServerRef {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiLabelSelector {
    pub selector: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiIp {
    pub ip: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiHealthStatus {
    pub listen_port: u16,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiService {
    pub protocol: String,
    pub listen_port: u16,
}

/// `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiTarget {
    /// Address for IP targets, server id for server targets, selector for
    /// label selector targets.
    fn identifier(&self) -> String {
        let by_kind = match self.kind.as_str() {
            "ip" => self.ip.as_ref().map(|ip| ip.ip.clone()),
            "server" => self.server.as_ref().map(|s| s.id.to_string()),
            "label_selector" => self.label_selector.as_ref().map(|l| l.selector.clone()),
            _ => None,
        };
        by_kind
            .or_else(|| self.ip.as_ref().map(|ip| ip.ip.clone()))
            .unwrap_or_else(|| self.kind.clone())
    }
}

impl ApiLoadBalancer {
    pub fn into_snapshot(self) -> LoadBalancerSnapshot {
        let lb = self;

        LoadBalancerSnapshot {
            id: lb.id,
            name: lb.name,
            targets: lb
                .targets
                .into_iter()
                .map(|t| Target {
                    identifier: t.identifier(),
                    health: t
                        .health_status
                        .into_iter()
                        .map(|h| HealthEntry {
                            listen_port: h.listen_port,
                            status: HealthStatus::from_provider(&h.status),
                        })
                        .collect(),
                })
                .collect(),
            services: lb
                .services
                .into_iter()
                .map(|s| Service {
                    protocol: s.protocol,
                    listen_port: s.listen_port,
                })
                .collect(),
            ingoing_traffic: lb.ingoing_traffic.unwrap_or(0),
            outgoing_traffic: lb.outgoing_traffic.unwrap_or(0),
        }
    }
}
