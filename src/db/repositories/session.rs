use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};

use crate::entities::sessions;

pub use sessions::Model as Session;

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Mint a fresh session for a login. The generated token is the row key.
    pub async fn create(&self, user_id: &str) -> Result<Session> {
        let model = sessions::ActiveModel {
            id: Set(generate_session_token()),
            user_id: Set(user_id.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        model
            .insert(&self.conn)
            .await
            .context("Failed to insert session")
    }

    pub async fn get(&self, token: &str) -> Result<Option<Session>> {
        sessions::Entity::find_by_id(token)
            .one(&self.conn)
            .await
            .context("Failed to query session")
    }

    pub async fn delete(&self, token: &str) -> Result<bool> {
        let result = sessions::Entity::delete_by_id(token)
            .exec(&self.conn)
            .await
            .context("Failed to delete session")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list(&self, limit: u64) -> Result<Vec<Session>> {
        sessions::Entity::find()
            .order_by_asc(sessions::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list sessions")
    }
}

/// Random opaque bearer token (64 character hex string).
#[must_use]
pub fn generate_session_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
