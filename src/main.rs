use anyhow::Result;
use atrium_agent::cluster_repo::ClusterAggregator;
use atrium_agent::config::AgentConfig;
use atrium_agent::config_store::ConfigStore;
use atrium_agent::routes;
use atrium_agent::stats_repo::{ProcFs, StatsAggregator};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let agent_config = AgentConfig::load()?;

    let stats = Arc::new(StatsAggregator::new(
        ProcFs::new(&agent_config.stats.proc_root),
        agent_config.stats.cpu_sample_delay(),
    ));
    let capability = agent_config.cluster.capability();
    tracing::info!("cluster reporting: {:?}", capability);
    let cluster = Arc::new(ClusterAggregator::new(capability));
    let store = Arc::new(ConfigStore::new(&agent_config.store.path));
    tracing::info!(
        "cores = {}, config store = {}",
        stats.cores(),
        store.path().display()
    );

    let app = routes::app(stats, cluster, store);
    let addr = format!("{}:{}", agent_config.server.host, agent_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("System stats API listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Received shutdown signal");
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
