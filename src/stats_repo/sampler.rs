// CPU utilization from two /proc/stat samples taken a short delay apart.

use std::time::Duration;
use tracing::{debug, instrument};

use super::proc::{self, ProcError, ProcFs};
use super::round_to;

/// Delay between the two counter reads.
pub const DEFAULT_SAMPLE_DELAY: Duration = Duration::from_millis(100);

/// Counters of the aggregate `cpu` line: user, nice, system, idle, iowait, irq, softirq.
/// Kernels that expose fewer columns leave the trailing ones at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSample {
    pub values: [u64; 7],
}

const IDLE: usize = 3;

impl CounterSample {
    /// Parses the first line of /proc/stat.
    pub fn parse(stat: &str) -> Result<Self, ProcError> {
        let line = stat
            .lines()
            .next()
            .ok_or_else(|| ProcError::parse(proc::STAT, "empty file"))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() <= IDLE + 1 {
            return Err(ProcError::parse(
                proc::STAT,
                format!("cpu line too short: {} fields", tokens.len()),
            ));
        }
        let mut values = [0u64; 7];
        for (i, slot) in values.iter_mut().enumerate() {
            if i + 1 < tokens.len() {
                *slot = proc::field(proc::STAT, &tokens, i + 1)?;
            }
        }
        Ok(Self { values })
    }

    /// Summed in u128 so no counter values can overflow.
    pub fn total(&self) -> u128 {
        self.values.iter().map(|&v| v as u128).sum()
    }

    pub fn idle(&self) -> u64 {
        self.values[IDLE]
    }
}

/// Busy share of the interval between two samples, 0..=100 with one decimal.
/// A non-advancing total (counter reset, identical samples) yields exactly 0.0.
pub fn utilization(before: &CounterSample, after: &CounterSample) -> f64 {
    let total_diff = after.total() as i128 - before.total() as i128;
    if total_diff <= 0 {
        return 0.0;
    }
    let idle_diff = after.idle() as i128 - before.idle() as i128;
    let busy = (total_diff - idle_diff) as f64 / total_diff as f64 * 100.0;
    round_to(busy, 1).clamp(0.0, 100.0)
}

pub struct CounterSampler {
    proc: ProcFs,
    delay: Duration,
}

impl CounterSampler {
    pub fn new(proc: ProcFs, delay: Duration) -> Self {
        Self { proc, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Samples /proc/stat, waits `delay` on the runtime timer, samples again.
    /// Read or parse failures are absorbed as 0.0.
    #[instrument(skip(self), fields(repo = "stats", operation = "sample_rate"))]
    pub async fn sample_rate(&self) -> f64 {
        match self.try_sample_rate().await {
            Ok(percent) => percent,
            Err(e) => {
                debug!("cpu sample failed: {}", e);
                0.0
            }
        }
    }

    async fn try_sample_rate(&self) -> Result<f64, ProcError> {
        let before = CounterSample::parse(&self.proc.read(proc::STAT).await?)?;
        tokio::time::sleep(self.delay).await;
        let after = CounterSample::parse(&self.proc.read(proc::STAT).await?)?;
        Ok(utilization(&before, &after))
    }
}
