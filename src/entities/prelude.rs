pub use super::ledger_entries::Entity as LedgerEntries;
pub use super::sessions::Entity as Sessions;
pub use super::suppliers::Entity as Suppliers;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
