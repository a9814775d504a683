//! Bulk ingest for offline-queued records.
//!
//! Items are inserted strictly one at a time with no atomicity across the
//! list; whatever succeeded stays committed. The response is a per-item
//! result ledger so partial failure is observable instead of being folded
//! into an all-or-nothing error.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ledger::CreateLedgerEntryRequest;
use super::transactions::{CreateTransactionRequest, DEFAULT_CURRENCY};
use super::{ApiError, ApiResponse, AppState};
use crate::db::{NewLedgerEntry, NewTransaction};

#[derive(Debug, Deserialize)]
pub struct SyncLedgerRequest {
    #[serde(default)]
    pub records: Vec<CreateLedgerEntryRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SyncTransactionsRequest {
    #[serde(default)]
    pub records: Vec<CreateTransactionRequest>,
}

#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    /// Server-assigned ids of the records that landed, in submission order.
    pub synced: Vec<String>,
    pub failed: Vec<SyncFailure>,
}

#[derive(Debug, Serialize)]
pub struct SyncFailure {
    /// Position of the record in the submitted list.
    pub index: usize,
    pub error: String,
}

/// POST /api/sync/ledger
/// Forces `is_synced=true` on every stored record.
pub async fn sync_ledger(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SyncLedgerRequest>,
) -> Result<Json<ApiResponse<SyncOutcome>>, ApiError> {
    let mut outcome = SyncOutcome {
        synced: Vec::new(),
        failed: Vec::new(),
    };

    for (index, record) in payload.records.into_iter().enumerate() {
        if record.supplier_id.is_empty() {
            outcome.failed.push(SyncFailure {
                index,
                error: "Supplier id is required".to_string(),
            });
            continue;
        }
        if record.material_type.is_empty() {
            outcome.failed.push(SyncFailure {
                index,
                error: "Material type is required".to_string(),
            });
            continue;
        }

        let result = state
            .store()
            .create_ledger_entry(NewLedgerEntry {
                supplier_id: record.supplier_id,
                material_type: record.material_type,
                weight_kg: record.weight_kg,
                capture_timestamp: record.capture_timestamp,
                is_synced: true,
            })
            .await;

        match result {
            Ok(entry) => outcome.synced.push(entry.id),
            Err(e) => outcome.failed.push(SyncFailure {
                index,
                error: e.to_string(),
            }),
        }
    }

    tracing::info!(
        "Ledger sync: {} stored, {} failed",
        outcome.synced.len(),
        outcome.failed.len()
    );

    Ok(Json(ApiResponse::success(outcome)))
}

/// POST /api/sync/transactions
pub async fn sync_transactions(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SyncTransactionsRequest>,
) -> Result<Json<ApiResponse<SyncOutcome>>, ApiError> {
    let mut outcome = SyncOutcome {
        synced: Vec::new(),
        failed: Vec::new(),
    };

    for (index, record) in payload.records.into_iter().enumerate() {
        if record.ledger_entry_id.is_empty() {
            outcome.failed.push(SyncFailure {
                index,
                error: "Ledger entry id is required".to_string(),
            });
            continue;
        }

        let result = state
            .store()
            .create_transaction(NewTransaction {
                ledger_entry_id: record.ledger_entry_id,
                amount: record.amount,
                currency: record
                    .currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                transaction_timestamp: record.transaction_timestamp,
                epr_fee: record.epr_fee,
                is_synced: true,
            })
            .await;

        match result {
            Ok(transaction) => outcome.synced.push(transaction.id),
            Err(e) => outcome.failed.push(SyncFailure {
                index,
                error: e.to_string(),
            }),
        }
    }

    tracing::info!(
        "Transaction sync: {} stored, {} failed",
        outcome.synced.len(),
        outcome.failed.len()
    );

    Ok(Json(ApiResponse::success(outcome)))
}
