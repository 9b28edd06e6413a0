// CPU, memory and aggregate host stats models

use serde::{Deserialize, Serialize};

use super::{NetworkInterface, Reported};

/// Uptime placeholder when /proc/uptime cannot be read or parsed.
pub const UNKNOWN_UPTIME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub percent: f64,
    pub cores: usize,
}

/// Memory snapshot in megabytes, derived from /proc/meminfo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_mb: f64,
    pub used_mb: f64,
    pub available_mb: f64,
    pub percent: f64,
}

/// Payload of GET /api/stats. Memory and network carry `{error}` in place of the value
/// when their source could not be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStats {
    pub cpu: CpuInfo,
    pub memory: Reported<MemoryInfo>,
    pub network: Reported<Vec<NetworkInterface>>,
    pub uptime: String,
    pub load_average: [f64; 3],
}
