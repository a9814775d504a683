use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::db::{NewUser, User};
use crate::entities::users::Role;

/// Sessions deleted per bulk-clear call. One bounded page, not a full scan.
const SESSION_CLEAR_PAGE: u64 = 500;

/// Accounts seeded by `/auth/init` on an empty store, one per role.
/// Passwords are `<username>123`; rotate them through `/config/users`.
const DEFAULT_USERS: &[(&str, Role)] = &[
    ("admin", Role::Admin),
    ("manager", Role::Manager),
    ("operator", Role::Operator),
    ("auditor", Role::Auditor),
];

/// Authenticated identity for the current request. Built once by
/// [`session_gate`] and threaded to handlers through request extensions;
/// nothing downstream re-resolves the session.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub token: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: UserDto,
    pub token: String,
}

#[derive(Serialize)]
pub struct InitResponse {
    /// Whether any user exists after this call.
    pub user_exists: bool,
    /// Whether this particular call performed the seeding.
    pub seeded: bool,
}

#[derive(Serialize)]
pub struct ClearSessionsResponse {
    pub cleared: usize,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Session gate for every route under `/api` except the exempt trio
/// (`/auth/init`, `/auth/login`, `/health`).
///
/// Resolves the bearer token to a session, the session to a user, and
/// rejects unknown tokens, dangling sessions, and disabled accounts — all
/// with 401. On success the [`AuthContext`] is attached for handlers.
pub async fn session_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let session = state
        .store()
        .get_session(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid session"))?;

    if session.user_id.is_empty() {
        return Err(ApiError::unauthorized("Invalid session"));
    }

    let user = state
        .store()
        .get_user(&session.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid session"))?;

    if user.id.is_empty() || !user.active {
        return Err(ApiError::unauthorized("Account disabled"));
    }

    tracing::Span::current().record("user_id", user.id.as_str());
    request.extensions_mut().insert(AuthContext { user, token });

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    Some(token.trim().to_string())
}

fn request_role(request: &Request) -> Result<Role, ApiError> {
    request
        .extensions()
        .get::<AuthContext>()
        .map(|ctx| ctx.user.role)
        .ok_or_else(|| ApiError::unauthorized("Missing session context"))
}

/// Role gate: admin only. A known caller outside the allow-list gets 403,
/// never 401.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    if request_role(&request)?.is_admin() {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::forbidden("Admin role required"))
    }
}

/// Role gate: supplier create/delete (admin and manager).
pub async fn require_supplier_write(request: Request, next: Next) -> Result<Response, ApiError> {
    if request_role(&request)?.can_manage_suppliers() {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::forbidden("Manager or admin role required"))
    }
}

/// Role gate: compliance reporting (admin and auditor).
pub async fn require_report_access(request: Request, next: Next) -> Result<Response, ApiError> {
    if request_role(&request)?.can_view_reports() {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::forbidden("Auditor or admin role required"))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /auth/init
/// Reports whether any user exists; seeds the default user set on an empty
/// store. Calling it again never seeds twice.
pub async fn init(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<InitResponse>>, ApiError> {
    let count = state.store().count_users().await?;

    if count > 0 {
        return Ok(Json(ApiResponse::success(InitResponse {
            user_exists: true,
            seeded: false,
        })));
    }

    for (username, role) in DEFAULT_USERS {
        let password = format!("{username}123");
        state
            .store()
            .create_user(NewUser {
                username: (*username).to_string(),
                password,
                role: *role,
                active: true,
                features: Vec::new(),
            })
            .await?;
    }

    tracing::info!("Seeded default user set");

    Ok(Json(ApiResponse::success(InitResponse {
        user_exists: true,
        seeded: true,
    })))
}

/// POST /auth/login
/// Exact-match credential check against an active account; mints and
/// persists a fresh opaque session token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .store()
        .find_user_by_credentials(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let session = state.store().create_session(&user.id).await?;

    tracing::info!("User logged in: {}", user.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        user: UserDto::from(user),
        token: session.id,
    })))
}

/// POST /auth/logout
/// Deletes the caller's own session. Absent rows are fine; the token is
/// dead either way.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.store().delete_session(&ctx.token).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    })))
}

/// GET /auth/me
pub async fn me(
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    Ok(Json(ApiResponse::success(UserDto::from(ctx.user))))
}

/// POST /admin/sessions/clear
/// Blunt global logout: deletes one bounded page of sessions, the caller's
/// included, and reports how many went.
pub async fn clear_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ClearSessionsResponse>>, ApiError> {
    let sessions = state.store().list_sessions(SESSION_CLEAR_PAGE).await?;

    let mut cleared = 0;
    for session in sessions {
        if state.store().delete_session(&session.id).await? {
            cleared += 1;
        }
    }

    tracing::info!("Cleared {} sessions", cleared);

    Ok(Json(ApiResponse::success(ClearSessionsResponse { cleared })))
}
