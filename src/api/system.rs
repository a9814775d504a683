use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
}

/// GET /api/health
/// Liveness plus a database ping. Exempt from the session gate so probes
/// can hit it unauthenticated.
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let database = state.store().ping().await.is_ok();

    Ok(Json(ApiResponse::success(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
    })))
}
