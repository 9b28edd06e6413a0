// /proc source access with an injectable root (tests point it at a temp tree).

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STAT: &str = "stat";
pub const MEMINFO: &str = "meminfo";
pub const NET_DEV: &str = "net/dev";
pub const UPTIME: &str = "uptime";
pub const LOADAVG: &str = "loadavg";

#[derive(Debug, Error)]
pub enum ProcError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed {file}: {reason}")]
    Parse { file: &'static str, reason: String },
}

impl ProcError {
    pub(crate) fn parse(file: &'static str, reason: impl Into<String>) -> Self {
        ProcError::Parse {
            file,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `<root>/<file>` in full.
    pub async fn read(&self, file: &'static str) -> Result<String, ProcError> {
        let path = self.root.join(file);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ProcError::Io { path, source })
    }
}

/// Parses the whitespace-delimited token at `idx` as `T`.
pub(crate) fn field<T: std::str::FromStr>(
    file: &'static str,
    tokens: &[&str],
    idx: usize,
) -> Result<T, ProcError> {
    let raw = tokens
        .get(idx)
        .ok_or_else(|| ProcError::parse(file, format!("missing field {}", idx)))?;
    raw.parse()
        .map_err(|_| ProcError::parse(file, format!("field {} is not numeric: {:?}", idx, raw)))
}
