use sea_orm::entity::prelude::*;

/// Payment/fee settlement tied to a ledger entry. `ledger_entry_id` is a
/// join key, not an enforced foreign key: dangling references are tolerated
/// and simply fall out of joined aggregates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub ledger_entry_id: String,

    pub amount: f64,

    pub currency: String,

    pub transaction_timestamp: String,

    pub epr_fee: f64,

    pub is_synced: bool,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
