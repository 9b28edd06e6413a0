// Reduce raw cluster object lists into ClusterSummary counts and a recent-events window.

use crate::models::{
    ClusterSummary, DeploymentCounts, EventInfo, InvolvedObject, NodeCapacity, NodeInfo,
    PodCounts, ServiceCounts,
};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Event, Node, Pod, Service};

/// Only the first raw events are considered for the recent window.
pub const EVENT_SCAN_LIMIT: usize = 20;
/// Maximum events reported.
pub const EVENT_LIMIT: usize = 10;

const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";

pub(crate) fn summarize(
    nodes: &[Node],
    pods: &[Pod],
    deployments: &[Deployment],
    services: &[Service],
    events: &[Event],
) -> ClusterSummary {
    ClusterSummary {
        nodes: nodes.iter().map(node_info).collect(),
        pods: count_pods(pods),
        deployments: count_deployments(deployments),
        services: count_services(services),
        events: recent_events(events),
    }
}

pub(crate) fn node_info(node: &Node) -> NodeInfo {
    let status = node.status.as_ref();
    let ready = status
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conds| conds.iter().any(|c| c.type_ == "Ready" && c.status == "True"));
    let roles = node
        .metadata
        .labels
        .as_ref()
        .map(|labels| {
            labels
                .keys()
                .filter_map(|k| k.strip_prefix(ROLE_LABEL_PREFIX))
                .filter(|r| !r.is_empty())
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();
    let capacity = status
        .and_then(|s| s.capacity.as_ref())
        .map(|cap| {
            let get = |key: &str| cap.get(key).map(|q| q.0.clone()).unwrap_or_default();
            NodeCapacity {
                cpu: get("cpu"),
                memory: get("memory"),
                pods: get("pods"),
            }
        })
        .unwrap_or_default();

    NodeInfo {
        name: node.metadata.name.clone().unwrap_or_default(),
        status: if ready { "Ready" } else { "NotReady" }.to_string(),
        roles,
        version: status
            .and_then(|s| s.node_info.as_ref())
            .map(|i| i.kubelet_version.clone())
            .unwrap_or_default(),
        capacity,
    }
}

pub(crate) fn count_pods(pods: &[Pod]) -> PodCounts {
    let mut counts = PodCounts {
        total: pods.len(),
        ..Default::default()
    };
    for pod in pods {
        match pod.status.as_ref().and_then(|s| s.phase.as_deref()) {
            Some("Running") => counts.running += 1,
            Some("Pending") => counts.pending += 1,
            Some("Failed") => counts.failed += 1,
            Some("Succeeded") => counts.succeeded += 1,
            _ => {}
        }
    }
    counts
}

pub(crate) fn count_deployments(deployments: &[Deployment]) -> DeploymentCounts {
    let mut counts = DeploymentCounts {
        total: deployments.len(),
        ..Default::default()
    };
    for d in deployments {
        let status = d.status.as_ref();
        let desired = d.spec.as_ref().and_then(|s| s.replicas);
        let ready = status.and_then(|s| s.ready_replicas);
        if ready == desired {
            counts.ready += 1;
        }
        if status
            .and_then(|s| s.unavailable_replicas)
            .is_some_and(|n| n > 0)
        {
            counts.unavailable += 1;
        }
    }
    counts
}

pub(crate) fn count_services(services: &[Service]) -> ServiceCounts {
    let mut counts = ServiceCounts {
        total: services.len(),
        ..Default::default()
    };
    for svc in services {
        match svc.spec.as_ref().and_then(|s| s.type_.as_deref()) {
            Some("ClusterIP") => counts.cluster_ip += 1,
            Some("NodePort") => counts.node_port += 1,
            Some("LoadBalancer") => counts.load_balancer += 1,
            _ => {}
        }
    }
    counts
}

fn event_timestamp(event: &Event) -> Option<DateTime<Utc>> {
    event
        .last_timestamp
        .as_ref()
        .map(|t| t.0)
        .or_else(|| event.event_time.as_ref().map(|t| t.0))
        .or_else(|| event.first_timestamp.as_ref().map(|t| t.0))
}

/// Events within one hour of the first listed event's timestamp (not of "now"),
/// scanning only the first [`EVENT_SCAN_LIMIT`] and keeping at most [`EVENT_LIMIT`].
pub(crate) fn recent_events(events: &[Event]) -> Vec<EventInfo> {
    let Some(anchor) = events.first().and_then(event_timestamp) else {
        return Vec::new();
    };
    let cutoff = anchor - TimeDelta::hours(1);

    events
        .iter()
        .take(EVENT_SCAN_LIMIT)
        .filter_map(|e| {
            let ts = event_timestamp(e)?;
            (ts >= cutoff).then(|| event_info(e, ts))
        })
        .take(EVENT_LIMIT)
        .collect()
}

fn event_info(event: &Event, timestamp: DateTime<Utc>) -> EventInfo {
    EventInfo {
        type_: event.type_.clone().unwrap_or_default(),
        reason: event.reason.clone().unwrap_or_default(),
        message: event.message.clone().unwrap_or_default(),
        namespace: event.metadata.namespace.clone().unwrap_or_default(),
        involved_object: InvolvedObject {
            kind: event.involved_object.kind.clone().unwrap_or_default(),
            name: event.involved_object.name.clone().unwrap_or_default(),
        },
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}
