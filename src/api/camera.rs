use axum::Json;
use serde::Serialize;

use super::{ApiError, ApiResponse};

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub url: String,
}

/// GET /api/camera/snapshot
/// Placeholder until yard cameras are wired up.
pub async fn snapshot() -> Result<Json<ApiResponse<SnapshotResponse>>, ApiError> {
    Ok(Json(ApiResponse::success(SnapshotResponse {
        url: "/images/camera-placeholder.jpg".to_string(),
    })))
}
