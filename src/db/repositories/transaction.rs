use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};

use crate::entities::transactions;

pub use transactions::Model as Transaction;

#[derive(Debug)]
pub struct NewTransaction {
    pub ledger_entry_id: String,
    pub amount: f64,
    pub currency: String,
    /// When absent the insert time is used.
    pub transaction_timestamp: Option<String>,
    pub epr_fee: f64,
    pub is_synced: bool,
}

pub struct TransactionRepository {
    conn: DatabaseConnection,
}

impl TransactionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, limit: u64) -> Result<Vec<Transaction>> {
        transactions::Entity::find()
            .order_by_desc(transactions::Column::TransactionTimestamp)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list transactions")
    }

    pub async fn create(&self, input: NewTransaction) -> Result<Transaction> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = transactions::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            ledger_entry_id: Set(input.ledger_entry_id),
            amount: Set(input.amount),
            currency: Set(input.currency),
            transaction_timestamp: Set(input.transaction_timestamp.unwrap_or_else(|| now.clone())),
            epr_fee: Set(input.epr_fee),
            is_synced: Set(input.is_synced),
            created_at: Set(now),
        };

        model
            .insert(&self.conn)
            .await
            .context("Failed to insert transaction")
    }
}
