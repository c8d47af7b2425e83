/// Health check endpoints
///
/// Operators use these; CCIP-Read clients never call them.
/// - `/health`: liveness plus the trusted signer address
/// - `/health/ready`: metadata store reachability
/// - `/metrics`: Prometheus exposition
use crate::{context::AppContext, metrics};
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::{Deserialize, Serialize};

/// Health status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Address the on-chain verifier should trust
    pub signer: String,
}

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/ready", get(readiness_probe))
        .route("/metrics", get(metrics_endpoint))
}

/// Liveness check
pub async fn health_basic(State(ctx): State<AppContext>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        signer: ctx.signer.address().to_string(),
    })
}

/// Readiness probe
///
/// Returns 503 while the metadata store is unreachable.
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Err(e) = ctx.store.ping().await {
        tracing::warn!(error = %e, "readiness_probe_failed: metadata store check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION")
    })))
}

async fn metrics_endpoint() -> String {
    metrics::render_metrics()
}
