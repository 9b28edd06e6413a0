// Integration tests: HTTP endpoints over a fake /proc tree and temp config store

mod common;

use atrium_agent::cluster_repo::{ClusterAggregator, ClusterCapability};
use atrium_agent::config_store::ConfigStore;
use atrium_agent::routes;
use atrium_agent::stats_repo::StatsAggregator;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use common::FakeProc;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Harness {
    server: TestServer,
    _proc: FakeProc,
    _store_dir: TempDir,
}

fn harness_with(proc: FakeProc) -> Harness {
    let store_dir = TempDir::new().unwrap();
    let app = routes::app(
        Arc::new(StatsAggregator::with_cores(
            proc.proc_fs(),
            Duration::from_millis(5),
            2,
        )),
        Arc::new(ClusterAggregator::new(ClusterCapability::Disabled)),
        Arc::new(ConfigStore::new(store_dir.path().join("config.json"))),
    );
    Harness {
        server: TestServer::try_new(app).unwrap(),
        _proc: proc,
        _store_dir: store_dir,
    }
}

fn harness() -> Harness {
    harness_with(FakeProc::populated())
}

#[tokio::test]
async fn test_health_endpoint_is_idempotent() {
    let h = harness();
    for _ in 0..3 {
        let response = h.server.get("/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "healthy" }));
    }
}

#[tokio::test]
async fn test_version_endpoint() {
    let h = harness();
    let response = h.server.get("/version").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["name"], "atrium-agent");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_stats_endpoint_full_payload() {
    let h = harness();
    let response = h.server.get("/api/stats").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["cpu"]["percent"], 0.0);
    assert_eq!(json["cpu"]["cores"], 2);
    assert_eq!(
        json["memory"],
        json!({ "total_mb": 1.0, "used_mb": 0.6, "available_mb": 0.4, "percent": 60.0 })
    );
    let names: Vec<&str> = json["network"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["eth0", "eth1", "eth2", "eth3"]);
    assert_eq!(json["uptime"], "1d 1h 1m");
    assert_eq!(json["load_average"], json!([0.52, 0.58, 0.59]));
}

#[tokio::test]
async fn test_stats_sub_endpoints() {
    let h = harness();

    let cpu: Value = h.server.get("/api/stats/cpu").await.json();
    assert_eq!(cpu, json!({ "cpu": 0.0 }));

    let memory: Value = h.server.get("/api/stats/memory").await.json();
    assert_eq!(memory["memory"]["percent"], 60.0);

    let network: Value = h.server.get("/api/stats/network").await.json();
    assert_eq!(network["network"].as_array().map(|a| a.len()), Some(4));
}

#[tokio::test]
async fn test_stats_errors_are_reported_inline() {
    let h = harness_with(FakeProc::empty());

    let response = h.server.get("/api/stats/memory").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["memory"]["error"].is_string());

    let json: Value = h.server.get("/api/stats").await.json();
    assert!(json["network"]["error"].is_string());
    assert_eq!(json["uptime"], "Unknown");
    assert_eq!(json["load_average"], json!([0.0, 0.0, 0.0]));
}

#[tokio::test]
async fn test_k3s_without_capability_reports_error() {
    let h = harness();
    let response = h.server.get("/api/k3s").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "error": "Kubernetes library not available" }));
}

#[tokio::test]
async fn test_config_defaults_when_nothing_stored() {
    let h = harness();
    let response = h.server.get("/api/config").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        r#"{"appTitle":"","services":[],"newsFeeds":[]}"#
    );
}

#[tokio::test]
async fn test_config_round_trip_and_delete() {
    let h = harness();
    let config = json!({
        "appTitle": "Atrium",
        "services": [
            { "name": "Jellyfin", "url": "http://nas:8096/", "description": "Media", "icon": "🎬", "color": "custom" }
        ],
        "newsFeeds": [{ "name": "Feed", "url": "https://example.com/feed/" }],
        "showK3sPods": true,
    });

    let response = h.server.post("/api/config").json(&config).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));

    let stored = h.server.get("/api/config").await;
    assert_eq!(stored.text(), serde_json::to_string(&config).unwrap());

    h.server.delete("/api/config").await.assert_json(&json!({ "status": "ok" }));
    h.server.delete("/api/config").await.assert_json(&json!({ "status": "ok" }));

    let after: Value = h.server.get("/api/config").await.json();
    assert_eq!(after, json!({ "appTitle": "", "services": [], "newsFeeds": [] }));
}

#[tokio::test]
async fn test_config_import_replaces_config() {
    let h = harness();
    h.server
        .post("/api/config")
        .json(&json!({ "appTitle": "old" }))
        .await
        .assert_status_ok();
    h.server
        .post("/api/config/import")
        .json(&json!({ "appTitle": "imported", "services": [], "newsFeeds": [] }))
        .await
        .assert_json(&json!({ "status": "ok" }));
    let stored: Value = h.server.get("/api/config").await.json();
    assert_eq!(stored["appTitle"], "imported");
}

#[tokio::test]
async fn test_malformed_config_body_is_500_and_keeps_previous() {
    let h = harness();
    h.server
        .post("/api/config")
        .json(&json!({ "appTitle": "kept" }))
        .await
        .assert_status_ok();

    let response = h.server.post("/api/config").text("{ definitely not json").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    let response = h.server.post("/api/config/import").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let stored: Value = h.server.get("/api/config").await.json();
    assert_eq!(stored["appTitle"], "kept");
}

#[tokio::test]
async fn test_unknown_path_is_404_json() {
    let h = harness();
    let response = h.server.get("/api/nope").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let h = harness();
    let response = h
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://dashboard.local"),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_wrong_method_on_known_path_is_404_json() {
    let h = harness();

    let response = h.server.post("/health").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "Not found" }));

    let response = h.server.get("/api/config/import").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "Not found" }));
}
