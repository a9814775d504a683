pub mod prelude;

pub mod ledger_entries;
pub mod sessions;
pub mod suppliers;
pub mod transactions;
pub mod users;
