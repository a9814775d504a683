use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use reclaimr::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory db.
    config.general.max_db_connections = 1;

    let state = reclaimr::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    reclaimr::api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Seed (idempotently) and log in as one of the default accounts.
async fn login(app: &Router, username: &str) -> String {
    let (status, _) = send(app, "GET", "/api/auth/init", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": format!("{username}123"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_and_bogus_tokens() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/dashboard", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_init_seeds_only_once() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/auth/init", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seeded"], true);
    assert_eq!(body["data"]["user_exists"], true);

    let (status, body) = send(&app, "GET", "/api/auth/init", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["seeded"], false);
    assert_eq!(body["data"]["user_exists"], true);

    // Seeding twice would have duplicated usernames; the admin dashboard
    // user count pins the set at exactly four.
    let token = login(&app, "admin").await;
    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_count"], 4);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = spawn_app().await;
    let (status, _) = send(&app, "GET", "/api/auth/init", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"username": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_lifecycle() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/auth/init", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"username": "admin", "password": "admin123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let login_user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    assert!(body["data"]["user"]["password"].is_null());

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], login_user_id.as_str());
    assert_eq!(body["data"]["role"], "admin");

    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_disabled_user_is_rejected_despite_valid_session() {
    let app = spawn_app().await;

    let admin_token = login(&app, "admin").await;
    let operator_token = login(&app, "operator").await;

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/config/users",
        Some(&admin_token),
        Some(serde_json::json!({
            "updates": [{"username": "operator", "active": false}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"][0], "operator");

    // The session row still exists; the disabled account invalidates it.
    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"username": "operator", "password": "operator123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_role_gets_forbidden_not_unauthorized() {
    let app = spawn_app().await;

    let operator_token = login(&app, "operator").await;
    let auditor_token = login(&app, "auditor").await;

    let (status, _) = send(&app, "GET", "/api/epr-report", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/suppliers",
        Some(&operator_token),
        Some(serde_json::json!({"name": "Scrapco"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/suppliers",
        Some(&auditor_token),
        Some(serde_json::json!({"name": "Scrapco"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/epr-report", Some(&auditor_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/sessions/clear",
        Some(&auditor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_supplier_crud() {
    let app = spawn_app().await;

    let manager_token = login(&app, "manager").await;
    let operator_token = login(&app, "operator").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/suppliers",
        Some(&manager_token),
        Some(serde_json::json!({
            "name": "Acme Reclamation",
            "contact_email": "ops@acme.example",
            "epr_number": "EPR-0042",
            "is_weee_compliant": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let supplier_id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(!supplier_id.is_empty());
    assert!(body["data"]["created_at"].is_string());

    // Any authenticated role can read the directory.
    let (status, body) = send(&app, "GET", "/api/suppliers", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Acme Reclamation");

    let (status, _) = send(
        &app,
        "POST",
        "/api/suppliers",
        Some(&manager_token),
        Some(serde_json::json!({"name": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/suppliers/{supplier_id}");
    let (status, _) = send(&app, "DELETE", &uri, Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", &uri, Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_session_clear_logs_everyone_out() {
    let app = spawn_app().await;

    let admin_token = login(&app, "admin").await;
    let manager_token = login(&app, "manager").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/sessions/clear",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["cleared"].as_u64().unwrap() >= 2);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_projections_differ_by_role() {
    let app = spawn_app().await;

    let operator_token = login(&app, "operator").await;
    let manager_token = login(&app, "manager").await;
    let admin_token = login(&app, "admin").await;
    let auditor_token = login(&app, "auditor").await;

    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "operator");
    assert!(body["data"]["total_weight_kg"].is_null());
    assert!(body["data"]["user_count"].is_null());
    assert!(body["data"]["recent_suppliers"].is_array());
    assert_eq!(body["data"]["pending_sync"], 0);
    assert_eq!(body["data"]["hardware"]["status"], "ok");

    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&manager_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["total_weight_kg"].is_number());
    assert!(body["data"]["total_value"].is_number());
    assert!(body["data"]["user_count"].is_null());

    // No suppliers yet: the compliance ratio must be zero, not an error.
    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["weee_compliance_pct"], 0.0);
    assert_eq!(body["data"]["user_count"], 4);
    assert_eq!(body["data"]["supplier_count"], 0);

    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&auditor_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["weee_compliance_pct"].is_number());
    assert!(body["data"]["total_epr_fees"].is_number());
    assert!(body["data"]["total_weight_kg"].is_null());
}

#[tokio::test]
async fn test_ledger_create_and_recent_dashboard_activity() {
    let app = spawn_app().await;

    let manager_token = login(&app, "manager").await;
    let operator_token = login(&app, "operator").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/suppliers",
        Some(&manager_token),
        Some(serde_json::json!({"name": "Acme Reclamation"})),
    )
    .await;
    let supplier_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/ledger",
        Some(&operator_token),
        Some(serde_json::json!({
            "supplier_id": supplier_id,
            "material_type": "PET bottles",
            "weight_kg": 40.0,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_synced"], false);
    assert!(body["data"]["capture_timestamp"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/ledger",
        Some(&operator_token),
        Some(serde_json::json!({"supplier_id": "", "material_type": "PET"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["recent_ledger_entries"][0]["material_type"], "PET bottles");
}

#[tokio::test]
async fn test_sync_reports_per_item_outcomes() {
    let app = spawn_app().await;

    let operator_token = login(&app, "operator").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sync/ledger",
        Some(&operator_token),
        Some(serde_json::json!({
            "records": [
                {
                    "supplier_id": "offline-supplier",
                    "material_type": "aluminum cans",
                    "weight_kg": 5.5,
                    "capture_timestamp": "2026-02-01T08:00:00Z",
                },
                {
                    "supplier_id": "",
                    "material_type": "glass",
                    "weight_kg": 1.0,
                },
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["synced"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["failed"][0]["index"], 1);

    // Synced records are forced to is_synced=true regardless of payload.
    let (status, body) = send(&app, "GET", "/api/ledger", Some(&operator_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["is_synced"], true);
}

#[tokio::test]
async fn test_camera_snapshot_placeholder() {
    let app = spawn_app().await;

    let operator_token = login(&app, "operator").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/camera/snapshot",
        Some(&operator_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["url"].as_str().unwrap().contains("placeholder"));
}
