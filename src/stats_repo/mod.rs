// Host stats from /proc: sampled CPU plus single-read memory, network, uptime and load.

pub mod proc;
pub mod sampler;
pub mod snapshot;

use crate::models::{CpuInfo, MemoryInfo, NetworkInterface, Reported, SystemStats};
use std::time::Duration;
use sysinfo::{CpuRefreshKind, System};
use tracing::instrument;

pub use proc::{ProcError, ProcFs};
pub use sampler::{CounterSample, CounterSampler, DEFAULT_SAMPLE_DELAY};
pub use snapshot::SnapshotReader;

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Logical processor count of the host, at least 1.
pub fn logical_cores() -> usize {
    let mut sys = System::new();
    sys.refresh_cpu_list(CpuRefreshKind::nothing());
    sys.cpus().len().max(1)
}

/// Composes the CPU sampler and snapshot readers into the /api/stats payload.
/// Holds no per-request state; every call reads the sources afresh.
pub struct StatsAggregator {
    sampler: CounterSampler,
    snapshots: SnapshotReader,
    cores: usize,
}

impl StatsAggregator {
    pub fn new(proc: ProcFs, cpu_sample_delay: Duration) -> Self {
        Self::with_cores(proc, cpu_sample_delay, logical_cores())
    }

    pub fn with_cores(proc: ProcFs, cpu_sample_delay: Duration, cores: usize) -> Self {
        Self {
            sampler: CounterSampler::new(proc.clone(), cpu_sample_delay),
            snapshots: SnapshotReader::new(proc),
            cores: cores.max(1),
        }
    }

    pub fn cores(&self) -> usize {
        self.cores
    }

    pub async fn cpu_percent(&self) -> f64 {
        self.sampler.sample_rate().await
    }

    pub async fn memory(&self) -> Reported<MemoryInfo> {
        self.snapshots.read_memory().await.into()
    }

    pub async fn network(&self) -> Reported<Vec<NetworkInterface>> {
        self.snapshots.read_network().await.into()
    }

    /// Never fails: each reader already absorbs or reports its own errors.
    #[instrument(skip(self), fields(repo = "stats", operation = "collect"))]
    pub async fn collect(&self) -> SystemStats {
        let (percent, memory, network, uptime, load_average) = tokio::join!(
            self.cpu_percent(),
            self.memory(),
            self.network(),
            self.snapshots.read_uptime(),
            self.snapshots.read_load_average(),
        );
        SystemStats {
            cpu: CpuInfo {
                percent,
                cores: self.cores,
            },
            memory,
            network,
            uptime,
            load_average,
        }
    }
}
