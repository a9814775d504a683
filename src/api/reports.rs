//! EPR compliance reporting endpoint.
//!
//! Handlers only fetch the pages and hand off to [`EprReport::compute`];
//! the join and classification rules live in `crate::epr` where they are
//! unit-tested in isolation.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::epr::EprReport;

/// Page cap for report reads. Wider than the dashboard page because the
/// report feeds regulatory filings, but still bounded.
const REPORT_PAGE: u64 = 1000;

/// GET /api/epr-report
/// Restricted to admin/auditor by the route's role gate.
pub async fn get_epr_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<EprReport>>, ApiError> {
    let store = state.store();

    let (suppliers, entries, transactions) = tokio::try_join!(
        store.list_suppliers(REPORT_PAGE),
        store.list_ledger_entries(REPORT_PAGE),
        store.list_transactions(REPORT_PAGE),
    )?;

    let report = EprReport::compute(&suppliers, &entries, &transactions);

    Ok(Json(ApiResponse::success(report)))
}
