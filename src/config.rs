use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cluster_repo::ClusterCapability;

const DEFAULT_CONFIG_FILE: &str = "config.toml";
/// k3s writes its admin kubeconfig here.
pub const DEFAULT_KUBECONFIG: &str = "/etc/rancher/k3s/k3s.yaml";
const MAX_CPU_SAMPLE_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub stats: StatsConfig,
    pub store: StoreConfig,
    pub cluster: ClusterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8001,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Root of the proc filesystem (tests point this at a fake tree).
    pub proc_root: PathBuf,
    /// Wait between the two /proc/stat reads of a CPU sample.
    pub cpu_sample_delay_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
            cpu_sample_delay_ms: 100,
        }
    }
}

impl StatsConfig {
    pub fn cpu_sample_delay(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Dashboard config JSON file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/config.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub enabled: bool,
    /// Fallback when in-cluster credentials are absent. Defaults to $KUBECONFIG, then the k3s path.
    pub kubeconfig: Option<PathBuf>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kubeconfig: None,
        }
    }
}

impl ClusterConfig {
    pub fn capability(&self) -> ClusterCapability {
        if !self.enabled {
            return ClusterCapability::Disabled;
        }
        ClusterCapability::Enabled {
            kubeconfig: kubeconfig_path(self.kubeconfig.as_deref()),
        }
    }
}

/// Explicit override, then $KUBECONFIG, then the k3s default.
pub fn kubeconfig_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    match std::env::var("KUBECONFIG") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_KUBECONFIG),
    }
}

impl AgentConfig {
    /// Loads `$CONFIG_FILE`, else `config.toml` if present, else built-in defaults.
    /// `$PORT` overrides `server.port`.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
        }
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AgentConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            !self.stats.proc_root.as_os_str().is_empty(),
            "stats.proc_root must be non-empty"
        );
        anyhow::ensure!(
            self.stats.cpu_sample_delay_ms <= MAX_CPU_SAMPLE_DELAY_MS,
            "stats.cpu_sample_delay_ms must be <= {}, got {}",
            MAX_CPU_SAMPLE_DELAY_MS,
            self.stats.cpu_sample_delay_ms
        );
        anyhow::ensure!(
            !self.store.path.as_os_str().is_empty(),
            "store.path must be non-empty"
        );
        Ok(())
    }
}
