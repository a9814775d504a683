//! Role-scoped dashboard summary.
//!
//! One bounded page of each collection is read concurrently; all aggregates
//! derive from those pages, never from full-table scans. Each role sees its
//! own projection of the shared numbers.

use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::auth::AuthContext;
use super::{ApiError, ApiResponse, AppState, LedgerEntryDto, SupplierDto, TransactionDto};
use crate::entities::users::Role;

/// Page cap for dashboard reads. Bounds response latency/cost; the summary
/// is an operational snapshot, not an exhaustive report.
const DASHBOARD_PAGE: u64 = 500;

/// Items in each recent-activity list.
const RECENT_ITEMS: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub role: Role,

    pub recent_suppliers: Vec<SupplierDto>,
    pub recent_ledger_entries: Vec<LedgerEntryDto>,
    pub recent_transactions: Vec<TransactionDto>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_epr_fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weee_compliance_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,

    pub hardware: HardwareHealth,
    pub pending_sync: i64,
}

/// Static stub; real hardware telemetry is not wired up.
#[derive(Debug, Serialize)]
pub struct HardwareHealth {
    pub status: &'static str,
    pub scale: &'static str,
    pub camera: &'static str,
}

impl HardwareHealth {
    const fn ok() -> Self {
        Self {
            status: "ok",
            scale: "online",
            camera: "online",
        }
    }
}

/// GET /api/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ApiError> {
    let store = state.store();

    // Independent page reads; aggregation only needs the joined results.
    let (suppliers, entries, transactions) = tokio::try_join!(
        store.list_suppliers(DASHBOARD_PAGE),
        store.list_ledger_entries(DASHBOARD_PAGE),
        store.list_transactions(DASHBOARD_PAGE),
    )?;

    let total_weight_kg: f64 = entries.iter().map(|e| e.weight_kg).sum();
    let total_value: f64 = transactions.iter().map(|t| t.amount).sum();
    let total_epr_fees: f64 = transactions.iter().map(|t| t.epr_fee).sum();

    let compliant = suppliers.iter().filter(|s| s.is_weee_compliant).count();
    let weee_compliance_pct = if suppliers.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        {
            compliant as f64 / suppliers.len() as f64 * 100.0
        }
    };
    let supplier_count = suppliers.len();

    // Pages are already newest-first, so "recent" is a prefix.
    let mut summary = DashboardSummary {
        role: ctx.user.role,
        recent_suppliers: suppliers
            .into_iter()
            .take(RECENT_ITEMS)
            .map(SupplierDto::from)
            .collect(),
        recent_ledger_entries: entries
            .into_iter()
            .take(RECENT_ITEMS)
            .map(LedgerEntryDto::from)
            .collect(),
        recent_transactions: transactions
            .into_iter()
            .take(RECENT_ITEMS)
            .map(TransactionDto::from)
            .collect(),
        total_weight_kg: None,
        total_value: None,
        total_epr_fees: None,
        weee_compliance_pct: None,
        supplier_count: None,
        user_count: None,
        hardware: HardwareHealth::ok(),
        pending_sync: 0,
    };

    match ctx.user.role {
        // Floor staff only see the activity feeds.
        Role::Operator => {}
        Role::Manager => {
            summary.total_weight_kg = Some(total_weight_kg);
            summary.total_value = Some(total_value);
            summary.total_epr_fees = Some(total_epr_fees);
        }
        Role::Admin => {
            summary.total_weight_kg = Some(total_weight_kg);
            summary.total_value = Some(total_value);
            summary.total_epr_fees = Some(total_epr_fees);
            summary.weee_compliance_pct = Some(weee_compliance_pct);
            summary.supplier_count = Some(supplier_count);
            summary.user_count = Some(state.store().count_users().await?);
        }
        Role::Auditor => {
            summary.total_epr_fees = Some(total_epr_fees);
            summary.weee_compliance_pct = Some(weee_compliance_pct);
            summary.supplier_count = Some(supplier_count);
        }
    }

    Ok(Json(ApiResponse::success(summary)))
}
