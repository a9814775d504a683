use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};

use crate::entities::ledger_entries;

pub use ledger_entries::Model as LedgerEntry;

#[derive(Debug)]
pub struct NewLedgerEntry {
    pub supplier_id: String,
    pub material_type: String,
    pub weight_kg: f64,
    /// When absent (online capture) the insert time is used.
    pub capture_timestamp: Option<String>,
    pub is_synced: bool,
}

pub struct LedgerRepository {
    conn: DatabaseConnection,
}

impl LedgerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, limit: u64) -> Result<Vec<LedgerEntry>> {
        ledger_entries::Entity::find()
            .order_by_desc(ledger_entries::Column::CaptureTimestamp)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list ledger entries")
    }

    pub async fn create(&self, input: NewLedgerEntry) -> Result<LedgerEntry> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ledger_entries::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            supplier_id: Set(input.supplier_id),
            material_type: Set(input.material_type),
            weight_kg: Set(input.weight_kg),
            capture_timestamp: Set(input.capture_timestamp.unwrap_or_else(|| now.clone())),
            is_synced: Set(input.is_synced),
            created_at: Set(now),
        };

        model
            .insert(&self.conn)
            .await
            .context("Failed to insert ledger entry")
    }
}
