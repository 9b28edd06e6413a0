// Cluster health summary models (GET /api/k3s)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub nodes: Vec<NodeInfo>,
    pub pods: PodCounts,
    pub deployments: DeploymentCounts,
    pub services: ServiceCounts,
    pub events: Vec<EventInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    /// `Ready` or `NotReady`.
    pub status: String,
    /// Comma-joined `node-role.kubernetes.io/<role>` suffixes; empty for plain workers.
    pub roles: String,
    /// Kubelet version.
    pub version: String,
    pub capacity: NodeCapacity,
}

/// Node capacity quantities, verbatim from the API (e.g. `"4"`, `"16318044Ki"`, `"110"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeCapacity {
    pub cpu: String,
    pub memory: String,
    pub pods: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodCounts {
    pub total: usize,
    pub running: usize,
    pub pending: usize,
    pub failed: usize,
    pub succeeded: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentCounts {
    pub total: usize,
    pub ready: usize,
    pub unavailable: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCounts {
    pub total: usize,
    pub cluster_ip: usize,
    pub node_port: usize,
    pub load_balancer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(rename = "type")]
    pub type_: String,
    pub reason: String,
    pub message: String,
    pub namespace: String,
    pub involved_object: InvolvedObject,
    /// RFC 3339.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvolvedObject {
    pub kind: String,
    pub name: String,
}
