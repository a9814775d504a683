use serde::{Deserialize, Serialize};

use crate::db::{LedgerEntry, Supplier, Transaction, User};
use crate::entities::users::Role;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// User record as exposed over the API. The credential column never crosses
/// this boundary.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub active: bool,
    pub features: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            active: user.active,
            features: user.features,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierDto {
    pub id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub epr_number: Option<String>,
    pub is_weee_compliant: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Supplier> for SupplierDto {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name,
            contact_name: s.contact_name,
            contact_email: s.contact_email,
            contact_phone: s.contact_phone,
            epr_number: s.epr_number,
            is_weee_compliant: s.is_weee_compliant,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntryDto {
    pub id: String,
    pub supplier_id: String,
    pub material_type: String,
    pub weight_kg: f64,
    pub capture_timestamp: String,
    pub is_synced: bool,
    pub created_at: String,
}

impl From<LedgerEntry> for LedgerEntryDto {
    fn from(e: LedgerEntry) -> Self {
        Self {
            id: e.id,
            supplier_id: e.supplier_id,
            material_type: e.material_type,
            weight_kg: e.weight_kg,
            capture_timestamp: e.capture_timestamp,
            is_synced: e.is_synced,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionDto {
    pub id: String,
    pub ledger_entry_id: String,
    pub amount: f64,
    pub currency: String,
    pub transaction_timestamp: String,
    pub epr_fee: f64,
    pub is_synced: bool,
    pub created_at: String,
}

impl From<Transaction> for TransactionDto {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            ledger_entry_id: t.ledger_entry_id,
            amount: t.amount,
            currency: t.currency,
            transaction_timestamp: t.transaction_timestamp,
            epr_fee: t.epr_fee,
            is_synced: t.is_synced,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_list_limit")]
    pub limit: u64,
}

const fn default_list_limit() -> u64 {
    100
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_list_limit(),
        }
    }
}
