use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LedgerEntryDto, ListQuery};
use crate::db::NewLedgerEntry;

#[derive(Debug, Deserialize)]
pub struct CreateLedgerEntryRequest {
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub material_type: String,
    #[serde(default)]
    pub weight_kg: f64,
    /// Offline captures carry their own timestamp; online ones omit it.
    pub capture_timestamp: Option<String>,
    #[serde(default)]
    pub is_synced: bool,
}

/// GET /api/ledger
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<LedgerEntryDto>>>, ApiError> {
    let entries = state.store().list_ledger_entries(query.limit).await?;
    let dtos: Vec<LedgerEntryDto> = entries.into_iter().map(LedgerEntryDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /api/ledger
/// Entries are create-only; there is no update route.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLedgerEntryRequest>,
) -> Result<Json<ApiResponse<LedgerEntryDto>>, ApiError> {
    if payload.supplier_id.is_empty() {
        return Err(ApiError::validation("Supplier id is required"));
    }
    if payload.material_type.is_empty() {
        return Err(ApiError::validation("Material type is required"));
    }

    let entry = state
        .store()
        .create_ledger_entry(NewLedgerEntry {
            supplier_id: payload.supplier_id,
            material_type: payload.material_type,
            weight_kg: payload.weight_kg,
            capture_timestamp: payload.capture_timestamp,
            is_synced: payload.is_synced,
        })
        .await?;

    Ok(Json(ApiResponse::success(LedgerEntryDto::from(entry))))
}
