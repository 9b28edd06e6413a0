// HTTP routes

mod config;
mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::cluster_repo::ClusterAggregator;
use crate::config_store::ConfigStore;
use crate::stats_repo::StatsAggregator;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) stats: Arc<StatsAggregator>,
    pub(crate) cluster: Arc<ClusterAggregator>,
    pub(crate) store: Arc<ConfigStore>,
}

pub fn app(
    stats: Arc<StatsAggregator>,
    cluster: Arc<ClusterAggregator>,
    store: Arc<ConfigStore>,
) -> Router {
    let state = AppState {
        stats,
        cluster,
        store,
    };
    Router::new()
        .route("/health", get(http::health_handler)) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/stats", get(http::stats_handler)) // GET /api/stats
        .route("/api/stats/cpu", get(http::cpu_handler)) // GET /api/stats/cpu
        .route("/api/stats/memory", get(http::memory_handler)) // GET /api/stats/memory
        .route("/api/stats/network", get(http::network_handler)) // GET /api/stats/network
        .route("/api/k3s", get(http::k3s_handler)) // GET /api/k3s
        .route(
            "/api/config",
            get(config::get_config)
                .post(config::save_config)
                .delete(config::delete_config),
        ) // GET | POST | DELETE /api/config
        .route("/api/config/import", post(config::save_config)) // POST /api/config/import
        .fallback(http::not_found)
        .method_not_allowed_fallback(http::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
