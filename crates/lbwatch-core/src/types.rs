//! Snapshot types for one poll cycle.
//!
//! These values are created fresh by the fetcher on every poll and dropped
//! once the translator has turned them into metric samples.

/// Provider-assigned load balancer identifier.
pub type LoadBalancerId = u64;

// ── Load balancer ──────────────────────────────────────────────────

/// State of one load balancer as reported by the control plane.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancerSnapshot {
    pub id: LoadBalancerId,
    pub name: String,
    pub targets: Vec<Target>,
    pub services: Vec<Service>,
    /// Ingoing traffic in bytes for the current billing period.
    pub ingoing_traffic: u64,
    /// Outgoing traffic in bytes for the current billing period.
    pub outgoing_traffic: u64,
}

/// A service (listener) configured on a load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub protocol: String,
    pub listen_port: u16,
}

// ── Targets ────────────────────────────────────────────────────────

/// An endpoint registered behind a load balancer.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Address string (or server id / label selector for non-IP targets).
    pub identifier: String,
    pub health: Vec<HealthEntry>,
}

/// Health verdict for one listen port of a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthEntry {
    pub listen_port: u16,
    pub status: HealthStatus,
}

/// Health status reported by the provider for a target port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    Unknown,
    /// A value the provider reported that this exporter does not know.
    Other(String),
}

impl HealthStatus {
    /// Parse the provider's status string. Never fails.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "healthy" => HealthStatus::Healthy,
            "unhealthy" => HealthStatus::Unhealthy,
            "unknown" => HealthStatus::Unknown,
            other => HealthStatus::Other(other.to_string()),
        }
    }

    /// Gauge value for this status: 1 healthy, 2 unhealthy, 3 otherwise.
    pub fn ordinal(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 1,
            HealthStatus::Unhealthy => 2,
            HealthStatus::Unknown | HealthStatus::Other(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_parse() {
        assert_eq!(HealthStatus::from_provider("healthy"), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_provider("unhealthy"), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::from_provider("unknown"), HealthStatus::Unknown);
    }

    #[test]
    fn unrecognized_status_is_kept_verbatim() {
        assert_eq!(
            HealthStatus::from_provider("degraded"),
            HealthStatus::Other("degraded".to_string())
        );
        // Case matters: the API only ever sends lowercase values.
        assert_eq!(
            HealthStatus::from_provider("Healthy"),
            HealthStatus::Other("Healthy".to_string())
        );
    }

    #[test]
    fn ordinal_mapping_is_total() {
        assert_eq!(HealthStatus::Healthy.ordinal(), 1);
        assert_eq!(HealthStatus::Unhealthy.ordinal(), 2);
        assert_eq!(HealthStatus::Unknown.ordinal(), 3);
        assert_eq!(HealthStatus::Other(String::new()).ordinal(), 3);
        assert_eq!(HealthStatus::from_provider("draining").ordinal(), 3);
    }
}
