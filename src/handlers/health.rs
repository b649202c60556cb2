//! Health and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "ok")]
    pub database: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "teamhive")]
    pub service: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    #[schema(example = "ok")]
    pub database: String,
    #[schema(example = "2026-08-26T10:30:00Z")]
    pub timestamp: String,
}

fn check_database(state: &AppState) -> bool {
    match state.db_pool.get() {
        Ok(mut conn) => diesel::sql_query("SELECT 1").execute(&mut conn).is_ok(),
        Err(e) => {
            error!(error = %e, "Health check could not reach the database");
            false
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = check_database(&state);
    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if db_ok { "ok" } else { "degraded" }.to_string(),
            database: if db_ok { "ok" } else { "unreachable" }.to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health/status",
    tag = "Health",
    responses(
        (status = 200, description = "Detailed service status", body = StatusResponse),
        (status = 503, description = "Service is degraded", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<AppState>) -> (StatusCode, Json<StatusResponse>) {
    let db_ok = check_database(&state);
    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(StatusResponse {
            status: if db_ok { "ok" } else { "degraded" }.to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: if db_ok { "ok" } else { "unreachable" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn live() -> StatusCode {
    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to accept traffic"),
        (status = 503, description = "Not ready")
    )
)]
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    if check_database(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
