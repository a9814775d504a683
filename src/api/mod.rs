use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod camera;
mod dashboard;
mod error;
mod ledger;
mod reports;
mod suppliers;
mod sync;
mod system;
mod transactions;
mod types;
mod users;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/init", get(auth::init))
        .route("/auth/login", post(auth::login))
        .route("/health", get(system::health))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

/// Everything behind the session gate. Role-restricted routes get a second
/// gate; layer order means the session gate always runs first.
fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin_routes = Router::new()
        .route("/admin/sessions/clear", post(auth::clear_sessions))
        .route(
            "/config/users",
            get(users::list_users).post(users::update_users),
        )
        .route_layer(middleware::from_fn(auth::require_admin));

    let reporting_routes = Router::new()
        .route("/epr-report", get(reports::get_epr_report))
        .route_layer(middleware::from_fn(auth::require_report_access));

    let supplier_write_routes = Router::new()
        .route("/suppliers", post(suppliers::create_supplier))
        .route("/suppliers/{id}", delete(suppliers::delete_supplier))
        .route_layer(middleware::from_fn(auth::require_supplier_write));

    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/suppliers", get(suppliers::list_suppliers))
        .route(
            "/ledger",
            get(ledger::list_entries).post(ledger::create_entry),
        )
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route("/sync/ledger", post(sync::sync_ledger))
        .route("/sync/transactions", post(sync::sync_transactions))
        .route("/camera/snapshot", get(camera::snapshot))
        .merge(admin_routes)
        .merge(reporting_routes)
        .merge(supplier_write_routes)
        .route_layer(middleware::from_fn_with_state(state, auth::session_gate))
}
