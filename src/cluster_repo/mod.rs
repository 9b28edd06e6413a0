// Kubernetes cluster health via kube-rs

mod reduce;

use crate::models::{ClusterSummary, Reported};
use futures_util::future::try_join5;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Event, Node, Pod, Service};
use kube::api::ListParams;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};
use kube::{Api, Client};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use reduce::{EVENT_LIMIT, EVENT_SCAN_LIMIT};

/// Whether cluster reporting is available, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCapability {
    Disabled,
    /// In-cluster credentials are tried first; `kubeconfig` is the fallback.
    Enabled { kubeconfig: PathBuf },
}

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Kubernetes library not available")]
    Unavailable,

    #[error("No kubernetes configuration found")]
    NoConfiguration,

    #[error("{0}")]
    Api(#[from] kube::Error),
}

pub struct ClusterAggregator {
    capability: ClusterCapability,
}

impl ClusterAggregator {
    pub fn new(capability: ClusterCapability) -> Self {
        Self { capability }
    }

    pub fn capability(&self) -> &ClusterCapability {
        &self.capability
    }

    /// Summary of the whole cluster, or `{error}` when any step fails. Never partial.
    pub async fn collect_cluster(&self) -> Reported<ClusterSummary> {
        let result = self.try_collect().await;
        if let Err(ref e) = result {
            match e {
                ClusterError::Unavailable => debug!("cluster reporting disabled"),
                _ => warn!("cluster summary failed: {}", e),
            }
        }
        result.into()
    }

    #[instrument(skip(self), fields(repo = "cluster", operation = "collect_cluster"))]
    pub async fn try_collect(&self) -> Result<ClusterSummary, ClusterError> {
        let kubeconfig = match &self.capability {
            ClusterCapability::Disabled => return Err(ClusterError::Unavailable),
            ClusterCapability::Enabled { kubeconfig } => kubeconfig,
        };
        let client = connect(kubeconfig).await?;

        let params = ListParams::default();
        let (nodes, pods, deployments, services, events) = try_join5(
            Api::<Node>::all(client.clone()).list(&params),
            Api::<Pod>::all(client.clone()).list(&params),
            Api::<Deployment>::all(client.clone()).list(&params),
            Api::<Service>::all(client.clone()).list(&params),
            Api::<Event>::all(client).list(&params),
        )
        .await?;

        Ok(reduce::summarize(
            &nodes.items,
            &pods.items,
            &deployments.items,
            &services.items,
            &events.items,
        ))
    }
}

async fn connect(kubeconfig: &Path) -> Result<Client, ClusterError> {
    let config = match Config::incluster() {
        Ok(config) => config,
        Err(e) => {
            debug!("in-cluster config unavailable ({}), trying {}", e, kubeconfig.display());
            load_kubeconfig(kubeconfig)
                .await
                .ok_or(ClusterError::NoConfiguration)?
        }
    };
    Ok(Client::try_from(config)?)
}

async fn load_kubeconfig(path: &Path) -> Option<Config> {
    let kubeconfig = match Kubeconfig::read_from(path) {
        Ok(k) => k,
        Err(e) => {
            debug!("kubeconfig {} unreadable: {}", path.display(), e);
            return None;
        }
    };
    match Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await {
        Ok(config) => Some(config),
        Err(e) => {
            debug!("kubeconfig {} unusable: {}", path.display(), e);
            None
        }
    }
}
