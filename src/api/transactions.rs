use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ListQuery, TransactionDto};
use crate::db::NewTransaction;

pub const DEFAULT_CURRENCY: &str = "GBP";

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(default)]
    pub ledger_entry_id: String,
    #[serde(default)]
    pub amount: f64,
    pub currency: Option<String>,
    pub transaction_timestamp: Option<String>,
    #[serde(default)]
    pub epr_fee: f64,
    #[serde(default)]
    pub is_synced: bool,
}

/// GET /api/transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<TransactionDto>>>, ApiError> {
    let transactions = state.store().list_transactions(query.limit).await?;
    let dtos: Vec<TransactionDto> = transactions.into_iter().map(TransactionDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /api/transactions
/// The referenced ledger entry is not validated; settlement records may
/// arrive before their weighing event syncs.
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<Json<ApiResponse<TransactionDto>>, ApiError> {
    if payload.ledger_entry_id.is_empty() {
        return Err(ApiError::validation("Ledger entry id is required"));
    }

    let transaction = state
        .store()
        .create_transaction(NewTransaction {
            ledger_entry_id: payload.ledger_entry_id,
            amount: payload.amount,
            currency: payload
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            transaction_timestamp: payload.transaction_timestamp,
            epr_fee: payload.epr_fee,
            is_synced: payload.is_synced,
        })
        .await?;

    Ok(Json(ApiResponse::success(TransactionDto::from(transaction))))
}
