//! HTTP API for optimization requests, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use optimizer_lib::{
    Catalog, OptimizationRequest, OptimizationResponse, OptimizerError, OptimizerMetrics,
    ScalingAnalyzer,
};
use prometheus::{Encoder, TextEncoder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub analyzer: Arc<ScalingAnalyzer>,
    pub metrics: OptimizerMetrics,
    pub run_timeout: Duration,
    fingerprint: String,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        analyzer: ScalingAnalyzer,
        metrics: OptimizerMetrics,
        run_timeout: Duration,
    ) -> Self {
        let fingerprint = catalog.fingerprint();
        Self {
            catalog: Arc::new(catalog),
            analyzer: Arc::new(analyzer),
            metrics,
            run_timeout,
            fingerprint,
        }
    }
}

/// Body of `POST /api/v1/optimize`
#[derive(Debug, Deserialize)]
pub struct OptimizeBody {
    #[serde(flatten)]
    pub request: OptimizationRequest,
    /// Fixed seed for reproducible runs; OS entropy otherwise
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    catalog_instances: usize,
    catalog_fingerprint: String,
    checked_at: i64,
}

/// Errors surfaced to HTTP callers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Timeout(Duration),
    Internal(String),
}

impl From<OptimizerError> for ApiError {
    fn from(err: OptimizerError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Timeout(budget) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("optimization exceeded {}ms budget", budget.as_millis()),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Liveness with catalog identity
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        catalog_instances: state.catalog.len(),
        catalog_fingerprint: state.fingerprint.clone(),
        checked_at: chrono::Utc::now().timestamp(),
    })
}

/// Instance types the service optimizes over
async fn catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "fingerprint": state.fingerprint,
        "instances": state.catalog.instances(),
    }))
}

/// Run one optimization on the blocking pool within the configured budget.
///
/// The search shares the handler's deadline, so a timed-out run stops at its
/// next generation instead of finishing in the background.
async fn optimize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OptimizeBody>,
) -> Result<Json<OptimizationResponse>, ApiError> {
    let catalog = state.catalog.clone();
    let analyzer = state.analyzer.clone();
    let OptimizeBody { request, seed } = body;
    let deadline = Instant::now() + state.run_timeout;

    let task = tokio::task::spawn_blocking(move || {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        analyzer.optimize_until(&catalog, &request, Some(deadline), &mut rng)
    });

    let timed_out = || {
        state.metrics.inc_deadline_exceeded();
        warn!(
            budget_ms = state.run_timeout.as_millis() as u64,
            "Optimization timed out"
        );
        ApiError::Timeout(state.run_timeout)
    };

    match tokio::time::timeout_at(deadline.into(), task).await {
        Ok(Ok(Ok(response))) => Ok(Json(response)),
        Ok(Ok(Err(OptimizerError::DeadlineExceeded { .. }))) => Err(timed_out()),
        Ok(Ok(Err(e))) => {
            warn!(error = %e, "Optimization request rejected");
            Err(e.into())
        }
        Ok(Err(join_err)) => Err(ApiError::Internal(join_err.to_string())),
        Err(_) => Err(timed_out()),
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            e.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/optimize", post(optimize))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
