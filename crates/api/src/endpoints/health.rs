//! Liveness and readiness endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::middleware::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Anniversary Voting App API",
        status: "running",
    })
}

/// Always healthy while the process serves requests.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Ready once the startup reconciliation has converged.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if state.catalog.ready {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                error: None,
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                status: "not_ready",
                error: state.catalog.error,
            }),
        )
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
}
