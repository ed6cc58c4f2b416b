//! Snapshot → gauge samples.
//!
//! Pure mapping with no I/O. Every load balancer yields a target count, a
//! service count, two traffic samples, and one health sample per
//! (target, listen port) pair the provider reported.

use lbwatch_core::LoadBalancerSnapshot;

use crate::registry::{GaugeDesc, MetricSample, Registry, RegistryError};

pub const LABEL_LOADBALANCER_ID: &str = "loadbalancer_id";
pub const LABEL_LOADBALANCER_NAME: &str = "loadbalancer_name";
pub const LABEL_ENDPOINT_LISTEN_PORT: &str = "endpoint_listen_port";
pub const LABEL_TARGET_IDENTIFIER: &str = "target_identifier";
pub const LABEL_TRAFFIC_DIRECTION: &str = "traffic_direction";

pub const TARGET_COUNT: GaugeDesc = GaugeDesc {
    name: "hetzner_lb_target_count",
    help: "Number of targets in a load balancer",
    labels: &[LABEL_LOADBALANCER_ID, LABEL_LOADBALANCER_NAME],
};

pub const SERVICE_COUNT: GaugeDesc = GaugeDesc {
    name: "hetzner_lb_service_count",
    help: "Number of services in a load balancer",
    labels: &[LABEL_LOADBALANCER_ID, LABEL_LOADBALANCER_NAME],
};

pub const TARGET_HEALTH_STATUS: GaugeDesc = GaugeDesc {
    name: "hetzner_lb_target_health_status",
    help: "Health status of a target",
    labels: &[
        LABEL_LOADBALANCER_ID,
        LABEL_ENDPOINT_LISTEN_PORT,
        LABEL_TARGET_IDENTIFIER,
    ],
};

pub const TRAFFIC_BYTES: GaugeDesc = GaugeDesc {
    name: "hetzner_lb_traffic_bytes",
    help: "traffic of a load balancer",
    labels: &[LABEL_LOADBALANCER_ID, LABEL_TRAFFIC_DIRECTION],
};

/// All gauges produced by `translate`, in exposition order.
pub const GAUGES: [GaugeDesc; 4] = [TARGET_COUNT, SERVICE_COUNT, TARGET_HEALTH_STATUS, TRAFFIC_BYTES];

/// Register every gauge `translate` emits.
pub async fn register_gauges(registry: &Registry) -> Result<(), RegistryError> {
    for desc in GAUGES {
        registry.register(desc).await?;
    }
    Ok(())
}

/// Map one poll's snapshots to gauge samples. Consumes the snapshots.
pub fn translate(snapshots: Vec<LoadBalancerSnapshot>) -> Vec<MetricSample> {
    let mut samples = Vec::new();

    for lb in snapshots {
        let id = lb.id.to_string();

        samples.push(MetricSample::new(
            TARGET_COUNT.name,
            vec![
                (LABEL_LOADBALANCER_ID, id.clone()),
                (LABEL_LOADBALANCER_NAME, lb.name.clone()),
            ],
            lb.targets.len() as f64,
        ));
        samples.push(MetricSample::new(
            SERVICE_COUNT.name,
            vec![
                (LABEL_LOADBALANCER_ID, id.clone()),
                (LABEL_LOADBALANCER_NAME, lb.name),
            ],
            lb.services.len() as f64,
        ));

        for target in lb.targets {
            for health in target.health {
                samples.push(MetricSample::new(
                    TARGET_HEALTH_STATUS.name,
                    vec![
                        (LABEL_LOADBALANCER_ID, id.clone()),
                        (LABEL_ENDPOINT_LISTEN_PORT, health.listen_port.to_string()),
                        (LABEL_TARGET_IDENTIFIER, target.identifier.clone()),
                    ],
                    f64::from(health.status.ordinal()),
                ));
            }
        }

        samples.push(MetricSample::new(
            TRAFFIC_BYTES.name,
            vec![
                (LABEL_LOADBALANCER_ID, id.clone()),
                (LABEL_TRAFFIC_DIRECTION, "in".to_string()),
            ],
            lb.ingoing_traffic as f64,
        ));
        samples.push(MetricSample::new(
            TRAFFIC_BYTES.name,
            vec![
                (LABEL_LOADBALANCER_ID, id),
                (LABEL_TRAFFIC_DIRECTION, "out".to_string()),
            ],
            lb.outgoing_traffic as f64,
        ));
    }

    samples
}
