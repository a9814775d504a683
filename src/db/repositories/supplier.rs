use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};

use crate::entities::suppliers;

pub use suppliers::Model as Supplier;

#[derive(Debug)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub epr_number: Option<String>,
    pub is_weee_compliant: bool,
}

pub struct SupplierRepository {
    conn: DatabaseConnection,
}

impl SupplierRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Most recent page first; callers pass their own page cap.
    pub async fn list(&self, limit: u64) -> Result<Vec<Supplier>> {
        suppliers::Entity::find()
            .order_by_desc(suppliers::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list suppliers")
    }

    pub async fn create(&self, input: NewSupplier) -> Result<Supplier> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = suppliers::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(input.name),
            contact_name: Set(input.contact_name),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            epr_number: Set(input.epr_number),
            is_weee_compliant: Set(input.is_weee_compliant),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        model
            .insert(&self.conn)
            .await
            .context("Failed to insert supplier")
    }

    /// Removes the supplier row only. Ledger entries and transactions that
    /// reference it are left in place.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = suppliers::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete supplier")?;

        Ok(result.rows_affected > 0)
    }
}
