//! Admin user-configuration surface.
//!
//! Accounts are never deleted here; disabling (`active=false`) is the
//! retirement path, and it locks the account out of authentication entirely.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::db::UserPatch;
use crate::entities::users::Role;

const USER_LIST_PAGE: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    pub username: String,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUsersRequest {
    #[serde(default)]
    pub updates: Vec<UserUpdate>,
}

#[derive(Debug, Serialize)]
pub struct UpdateUsersResponse {
    pub updated: Vec<String>,
    /// Usernames that matched no account. Not an error for the batch.
    pub unknown: Vec<String>,
}

/// GET /api/config/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.store().list_users(USER_LIST_PAGE).await?;
    let dtos: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// POST /api/config/users
/// Bulk-updates role, active flag, and feature set per username. This is
/// the only mutation path for accounts.
pub async fn update_users(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateUsersRequest>,
) -> Result<Json<ApiResponse<UpdateUsersResponse>>, ApiError> {
    let mut response = UpdateUsersResponse {
        updated: Vec::new(),
        unknown: Vec::new(),
    };

    for update in payload.updates {
        let patch = UserPatch {
            role: update.role,
            active: update.active,
            features: update.features,
        };

        if state.store().patch_user(&update.username, patch).await? {
            response.updated.push(update.username);
        } else {
            response.unknown.push(update.username);
        }
    }

    Ok(Json(ApiResponse::success(response)))
}
