use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Back-office role. Stored as a string column; the enum is closed so every
/// role-scoped decision point can match exhaustively.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "operator")]
    Operator,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "auditor")]
    Auditor,
}

impl Role {
    /// Supplier create/delete is restricted to management.
    #[must_use]
    pub const fn can_manage_suppliers(self) -> bool {
        match self {
            Self::Admin | Self::Manager => true,
            Self::Operator | Self::Auditor => false,
        }
    }

    /// Compliance reporting is restricted to admin and audit staff.
    #[must_use]
    pub const fn can_view_reports(self) -> bool {
        match self {
            Self::Admin | Self::Auditor => true,
            Self::Operator | Self::Manager => false,
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Plaintext credential, compared byte-for-byte at login. A known weak
    /// point of the system this ports; see DESIGN.md before changing.
    pub password: String,

    pub role: Role,

    pub active: bool,

    /// JSON-encoded list of feature flags granted to the account.
    pub features: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
