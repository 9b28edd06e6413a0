// Single-read sources: memory, network counters, uptime, load average.

use tracing::{debug, instrument};

use super::proc::{self, ProcError, ProcFs};
use super::round_to;
use crate::models::{MemoryInfo, NetworkInterface, UNKNOWN_UPTIME};

/// At most this many interfaces are reported, in /proc/net/dev order.
pub const MAX_INTERFACES: usize = 4;
const LOOPBACK: &str = "lo";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Parses /proc/meminfo (`Key:   value kB` lines) into megabytes.
pub fn parse_meminfo(content: &str) -> Result<MemoryInfo, ProcError> {
    let mut total = None;
    let mut available = None;
    let mut free = None;
    for line in content.lines() {
        let mut parts = line.split(':');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total,
            "MemAvailable" => &mut available,
            "MemFree" => &mut free,
            _ => continue,
        };
        let tokens: Vec<&str> = value.split_whitespace().collect();
        *slot = Some(proc::field::<u64>(proc::MEMINFO, &tokens, 0)?);
    }

    let total = total.unwrap_or(0);
    let available = available.or(free).unwrap_or(0);
    let used = total.saturating_sub(available);
    let percent = if total > 0 {
        round_to(used as f64 / total as f64 * 100.0, 1)
    } else {
        0.0
    };
    Ok(MemoryInfo {
        total_mb: round_to(total as f64 / 1024.0, 1),
        used_mb: round_to(used as f64 / 1024.0, 1),
        available_mb: round_to(available as f64 / 1024.0, 1),
        percent,
    })
}

/// Parses /proc/net/dev. Column 1 is received bytes, column 9 transmitted bytes.
/// Every line is parsed before truncation, so a malformed fifth interface still fails the read.
pub fn parse_net_dev(content: &str) -> Result<Vec<NetworkInterface>, ProcError> {
    let mut interfaces = Vec::new();
    for line in content.lines().skip(2) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            continue;
        };
        let name = first.trim_end_matches(':');
        if name == LOOPBACK {
            continue;
        }
        let rx_bytes: u64 = proc::field(proc::NET_DEV, &tokens, 1)?;
        let tx_bytes: u64 = proc::field(proc::NET_DEV, &tokens, 9)?;
        interfaces.push(NetworkInterface {
            name: name.to_string(),
            rx_mb: round_to(rx_bytes as f64 / BYTES_PER_MB, 2),
            tx_mb: round_to(tx_bytes as f64 / BYTES_PER_MB, 2),
        });
    }
    interfaces.truncate(MAX_INTERFACES);
    Ok(interfaces)
}

/// Formats seconds since boot as `"{d}d {h}h {m}m"`.
pub fn format_uptime(seconds: f64) -> String {
    let secs = seconds as u64;
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{}d {}h {}m", days, hours, minutes)
}

pub fn parse_uptime(content: &str) -> Result<String, ProcError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let seconds: f64 = proc::field(proc::UPTIME, &tokens, 0)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ProcError::parse(proc::UPTIME, "uptime is not a finite duration"));
    }
    Ok(format_uptime(seconds))
}

pub fn parse_loadavg(content: &str) -> Result<[f64; 3], ProcError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    Ok([
        proc::field(proc::LOADAVG, &tokens, 0)?,
        proc::field(proc::LOADAVG, &tokens, 1)?,
        proc::field(proc::LOADAVG, &tokens, 2)?,
    ])
}

pub struct SnapshotReader {
    proc: ProcFs,
}

impl SnapshotReader {
    pub fn new(proc: ProcFs) -> Self {
        Self { proc }
    }

    #[instrument(skip(self), fields(repo = "stats", operation = "read_memory"))]
    pub async fn read_memory(&self) -> Result<MemoryInfo, ProcError> {
        parse_meminfo(&self.proc.read(proc::MEMINFO).await?)
    }

    #[instrument(skip(self), fields(repo = "stats", operation = "read_network"))]
    pub async fn read_network(&self) -> Result<Vec<NetworkInterface>, ProcError> {
        parse_net_dev(&self.proc.read(proc::NET_DEV).await?)
    }

    /// Falls back to `"Unknown"` on any failure.
    pub async fn read_uptime(&self) -> String {
        let result = match self.proc.read(proc::UPTIME).await {
            Ok(content) => parse_uptime(&content),
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            debug!("uptime unavailable: {}", e);
            UNKNOWN_UPTIME.to_string()
        })
    }

    /// Falls back to `[0.0, 0.0, 0.0]` on any failure.
    pub async fn read_load_average(&self) -> [f64; 3] {
        let result = match self.proc.read(proc::LOADAVG).await {
            Ok(content) => parse_loadavg(&content),
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            debug!("load average unavailable: {}", e);
            [0.0; 3]
        })
    }
}
