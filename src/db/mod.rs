use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::ledger::{LedgerEntry, NewLedgerEntry};
pub use repositories::session::Session;
pub use repositories::supplier::{NewSupplier, Supplier};
pub use repositories::transaction::{NewTransaction, Transaction};
pub use repositories::user::{NewUser, User, UserPatch};

/// Facade over the entity store. Every method is a single-collection
/// operation; there is no transaction discipline across entities.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("memory") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn session_repo(&self) -> repositories::session::SessionRepository {
        repositories::session::SessionRepository::new(self.conn.clone())
    }

    fn supplier_repo(&self) -> repositories::supplier::SupplierRepository {
        repositories::supplier::SupplierRepository::new(self.conn.clone())
    }

    fn ledger_repo(&self) -> repositories::ledger::LedgerRepository {
        repositories::ledger::LedgerRepository::new(self.conn.clone())
    }

    fn transaction_repo(&self) -> repositories::transaction::TransactionRepository {
        repositories::transaction::TransactionRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn list_users(&self, limit: u64) -> Result<Vec<User>> {
        self.user_repo().list(limit).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().find_by_credentials(username, password).await
    }

    pub async fn create_user(&self, input: NewUser) -> Result<User> {
        self.user_repo().create(input).await
    }

    pub async fn patch_user(&self, username: &str, patch: UserPatch) -> Result<bool> {
        self.user_repo().apply_patch(username, patch).await
    }

    // ========== Sessions ==========

    pub async fn create_session(&self, user_id: &str) -> Result<Session> {
        self.session_repo().create(user_id).await
    }

    pub async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        self.session_repo().get(token).await
    }

    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        self.session_repo().delete(token).await
    }

    pub async fn list_sessions(&self, limit: u64) -> Result<Vec<Session>> {
        self.session_repo().list(limit).await
    }

    // ========== Suppliers ==========

    pub async fn list_suppliers(&self, limit: u64) -> Result<Vec<Supplier>> {
        self.supplier_repo().list(limit).await
    }

    pub async fn create_supplier(&self, input: NewSupplier) -> Result<Supplier> {
        self.supplier_repo().create(input).await
    }

    pub async fn delete_supplier(&self, id: &str) -> Result<bool> {
        self.supplier_repo().delete(id).await
    }

    // ========== Ledger ==========

    pub async fn list_ledger_entries(&self, limit: u64) -> Result<Vec<LedgerEntry>> {
        self.ledger_repo().list(limit).await
    }

    pub async fn create_ledger_entry(&self, input: NewLedgerEntry) -> Result<LedgerEntry> {
        self.ledger_repo().create(input).await
    }

    // ========== Transactions ==========

    pub async fn list_transactions(&self, limit: u64) -> Result<Vec<Transaction>> {
        self.transaction_repo().list(limit).await
    }

    pub async fn create_transaction(&self, input: NewTransaction) -> Result<Transaction> {
        self.transaction_repo().create(input).await
    }
}
