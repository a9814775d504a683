use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::users::{self, Role};

/// User data returned from the repository. The plaintext credential never
/// leaves this module except through `find_by_credentials`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub active: bool,
    pub features: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        let features = serde_json::from_str(&model.features).unwrap_or_default();
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            active: model.active,
            features,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Input for the seeding path.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub active: bool,
    pub features: Vec<String>,
}

/// Admin config-update patch; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub features: Option<Vec<String>>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    pub async fn list(&self, limit: u64) -> Result<Vec<User>> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(models.into_iter().map(User::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Exact plaintext credential match against an active account.
    /// Disabled accounts never match, regardless of the credential.
    pub async fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for login")?;

        Ok(user
            .filter(|u| u.active && u.password == password)
            .map(User::from))
    }

    pub async fn create(&self, input: NewUser) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();
        let features =
            serde_json::to_string(&input.features).context("Failed to encode feature set")?;

        let model = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(input.username),
            password: Set(input.password),
            role: Set(input.role),
            active: Set(input.active),
            features: Set(features),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(User::from(inserted))
    }

    /// Config-update path: the only way accounts are mutated. Returns false
    /// when the username does not exist.
    pub async fn apply_patch(&self, username: &str, patch: UserPatch) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(role) = patch.role {
            active.role = Set(role);
        }
        if let Some(enabled) = patch.active {
            active.active = Set(enabled);
        }
        if let Some(features) = patch.features {
            let encoded =
                serde_json::to_string(&features).context("Failed to encode feature set")?;
            active.features = Set(encoded);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(true)
    }
}
