// Wire models for the dashboard API

mod cluster;
mod network;
mod reported;
mod system;

pub use cluster::{
    ClusterSummary, DeploymentCounts, EventInfo, InvolvedObject, NodeCapacity, NodeInfo,
    PodCounts, ServiceCounts,
};
pub use network::NetworkInterface;
pub use reported::Reported;
pub use system::{CpuInfo, MemoryInfo, SystemStats, UNKNOWN_UPTIME};
