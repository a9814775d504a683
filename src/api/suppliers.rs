use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ListQuery, SupplierDto};
use crate::db::NewSupplier;

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    #[serde(default)]
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub epr_number: Option<String>,
    #[serde(default)]
    pub is_weee_compliant: bool,
}

/// GET /api/suppliers
pub async fn list_suppliers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<SupplierDto>>>, ApiError> {
    let suppliers = state.store().list_suppliers(query.limit).await?;
    let dtos: Vec<SupplierDto> = suppliers.into_iter().map(SupplierDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /api/suppliers
/// Server generates the id and timestamps; clients never supply them.
pub async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<Json<ApiResponse<SupplierDto>>, ApiError> {
    if payload.name.is_empty() {
        return Err(ApiError::validation("Supplier name is required"));
    }

    let supplier = state
        .store()
        .create_supplier(NewSupplier {
            name: payload.name,
            contact_name: payload.contact_name,
            contact_email: payload.contact_email,
            contact_phone: payload.contact_phone,
            epr_number: payload.epr_number,
            is_weee_compliant: payload.is_weee_compliant,
        })
        .await?;

    Ok(Json(ApiResponse::success(SupplierDto::from(supplier))))
}

/// DELETE /api/suppliers/{id}
/// Ledger entries and transactions referencing the supplier survive it.
pub async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let deleted = state.store().delete_supplier(&id).await?;
    if deleted {
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ApiError::not_found("Supplier", id))
    }
}
