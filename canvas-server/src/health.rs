//! Health check endpoints for Kubernetes probes.
//!
//! Provides liveness and readiness probes for container orchestration:
//! - `/health/live` - Liveness probe (restart if fails)
//! - `/health/ready` - Readiness probe (remove from LB if fails)
//! - `/health` - Same as `/health/ready`

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy"
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
    /// "analysis" when a reasoning service is configured, else "save_only"
    pub mode: &'static str,
    /// Individual component checks
    pub checks: HealthChecks,
}

/// Individual health checks.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Image directory exists or could be created
    pub image_store: bool,
    /// Name of the configured reasoning service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_service: Option<String>,
}

/// Liveness probe - is the server running?
///
/// Returns 200 OK if the process is alive.
/// Kubernetes will restart the pod if this fails.
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe - can the server accept drawings?
///
/// Kubernetes will remove the pod from the load balancer if this fails.
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let store_ok = match state.store.ensure_dir().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Image store not ready");
            false
        }
    };

    let status = HealthStatus {
        status: if store_ok { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.interpreter.is_some() {
            "analysis"
        } else {
            "save_only"
        },
        checks: HealthChecks {
            image_store: store_ok,
            reasoning_service: state
                .interpreter
                .as_ref()
                .map(|i| i.service_name().to_string()),
        },
    };

    let code = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}
