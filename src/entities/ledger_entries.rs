use sea_orm::entity::prelude::*;

/// One weighing event. Rows are append-only: there is no update route, and
/// deleting a supplier intentionally leaves its entries behind.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub supplier_id: String,

    /// Free-text material label; classified into an EPR stream at read time.
    pub material_type: String,

    pub weight_kg: f64,

    pub capture_timestamp: String,

    pub is_synced: bool,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
