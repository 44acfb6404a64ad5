//! Integration tests for the optimizer API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use optimizer_lib::{AnalyzerConfig, Catalog, InstanceSpec, OptimizerMetrics, ScalingAnalyzer};
use optimizer_server::api::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn spec(id: &str, vcpus: u32, memory_gib: f64, hourly_price: f64) -> InstanceSpec {
    InstanceSpec {
        id: id.to_string(),
        vcpus,
        memory_gib,
        hourly_price,
    }
}

fn setup_test_app() -> Router {
    let catalog = Catalog::new(vec![spec("X", 4, 8.0, 1.00), spec("Y", 4, 8.0, 0.50)]).unwrap();
    let metrics = OptimizerMetrics::new();
    let analyzer = ScalingAnalyzer::new(AnalyzerConfig::default()).with_metrics(metrics.clone());
    let state = Arc::new(AppState::new(catalog, analyzer, metrics, Duration::from_secs(10)));
    create_router(state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_optimize(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/optimize")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_healthz_reports_catalog() {
    let (status, health) = get_json(setup_test_app(), "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["catalog_instances"], 2);
    assert_eq!(health["catalog_fingerprint"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_catalog_lists_instances_in_order() {
    let (status, body) = get_json(setup_test_app(), "/api/v1/catalog").await;

    assert_eq!(status, StatusCode::OK);
    let instances = body["instances"].as_array().unwrap();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0]["id"], "X");
    assert_eq!(instances[1]["id"], "Y");
}

#[tokio::test]
async fn test_optimize_recommends_downgrade() {
    let (status, body) = post_optimize(
        setup_test_app(),
        serde_json::json!({
            "requirement": { "vcpus": 4, "memory_gib": 8.0 },
            "current_configuration": { "X": 1 },
            "strategy": "direct_pricing",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "downgrade");
    assert_eq!(body["optimal_configuration"], serde_json::json!({ "Y": 1 }));
    assert!((body["savings"].as_f64().unwrap() - 0.50).abs() < 1e-9);
    assert_eq!(body["strategy"], "direct_pricing");
}

#[tokio::test]
async fn test_optimize_seeded_evolutionary_run_is_reproducible() {
    let request = serde_json::json!({
        "requirement": { "vcpus": 8, "memory_gib": 16.0 },
        "current_configuration": { "X": 2 },
        "search_parameters": { "max_count": 2 },
        "seed": 7,
    });

    let (first_status, first) = post_optimize(setup_test_app(), request.clone()).await;
    let (_, second) = post_optimize(setup_test_app(), request).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(first["strategy"], "evolutionary");
    assert_eq!(first["optimal_configuration"], second["optimal_configuration"]);
    assert_eq!(first["search_stats"]["evaluations"], second["search_stats"]["evaluations"]);
}

#[tokio::test]
async fn test_optimize_infeasible_requirement_is_upgrade() {
    let (status, body) = post_optimize(
        setup_test_app(),
        serde_json::json!({
            "requirement": { "vcpus": 64, "memory_gib": 8.0 },
            "current_configuration": { "Y": 1 },
            "strategy": "direct_pricing",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["decision"], "upgrade");
    assert!(body["optimal_configuration"].is_null());
    assert_eq!(body["optimal_cost"], 0.0);
    assert_eq!(body["savings"], 0.0);
}

#[tokio::test]
async fn test_optimize_unknown_instance_is_bad_request() {
    let (status, body) = post_optimize(
        setup_test_app(),
        serde_json::json!({
            "requirement": { "vcpus": 4, "memory_gib": 8.0 },
            "current_configuration": { "Z": 1 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Z"));
}

#[tokio::test]
async fn test_optimize_invalid_search_parameters_is_bad_request() {
    let (status, body) = post_optimize(
        setup_test_app(),
        serde_json::json!({
            "requirement": { "vcpus": 4, "memory_gib": 8.0 },
            "current_configuration": { "X": 1 },
            "search_parameters": { "pop_size": 0 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_optimize_oversized_search_is_bad_request() {
    let (status, body) = post_optimize(
        setup_test_app(),
        serde_json::json!({
            "requirement": { "vcpus": 4, "memory_gib": 8.0 },
            "current_configuration": { "X": 1 },
            "search_parameters": { "pop_size": 1u64 << 40, "generations": 1 },
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pop_size"));

    let (status, _) = post_optimize(
        setup_test_app(),
        serde_json::json!({
            "requirement": { "vcpus": 4, "memory_gib": 8.0 },
            "current_configuration": { "X": 1 },
            "search_parameters": { "generations": 100_001 },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let app = setup_test_app();
    let (status, _) = post_optimize(
        app.clone(),
        serde_json::json!({
            "requirement": { "vcpus": 4, "memory_gib": 8.0 },
            "current_configuration": { "X": 1 },
            "strategy": "direct_pricing",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("cost_optimizer_runs_total"));
    assert!(metrics_text.contains("cost_optimizer_run_latency_seconds_bucket"));
    assert!(metrics_text.contains("cost_optimizer_decisions_total"));
}
