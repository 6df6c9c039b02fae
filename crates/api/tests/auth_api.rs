//! HTTP-level integration tests for login, logout and the current-user
//! endpoint.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, post_auth, post_json, put_json_auth, TestApp, ADMIN_EMAIL,
    ADMIN_PASSWORD,
};
use hrflow_api::auth::jwt::JwtConfig;
use serde_json::json;

async fn login(app: &TestApp, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app.app(),
        "/api/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Test: login with valid credentials returns a token and marks the user online
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_success_returns_token_and_user() {
    let app = TestApp::new();
    let (admin_id, _) = app.admin().await;

    let response = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["user"]["id"], admin_id);
    assert_eq!(json["user"]["role"], "admin");
    assert_eq!(json["user"]["isOnline"], true);
    assert!(json["user"].get("passwordHash").is_none());
}

// ---------------------------------------------------------------------------
// Test: wrong password and unknown email get the same 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.admin().await;

    let wrong_password = login(&app, ADMIN_EMAIL, "not-the-password").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let a = body_json(wrong_password).await;

    let unknown = login(&app, "nobody@company.com", ADMIN_PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let b = body_json(unknown).await;

    assert_eq!(a["error"], b["error"]);
    assert_eq!(a["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Test: email matching is exact
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_email_is_case_sensitive() {
    let app = TestApp::new();
    app.admin().await;

    let response = login(&app, &ADMIN_EMAIL.to_uppercase(), ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: missing body fields are a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_missing_fields_returns_400() {
    let app = TestApp::new();

    let response = post_json(app.app(), "/api/auth/login", json!({ "email": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.app(),
        "/api/auth/login",
        json!({ "email": "", "password": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: no signing secret fails closed with 500 SERVER_MISCONFIGURED
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_without_secret_is_misconfigured() {
    let mut config = common::test_config();
    config.jwt = JwtConfig::unconfigured();
    let app = TestApp::with_config(config);

    let response = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVER_MISCONFIGURED");
}

// ---------------------------------------------------------------------------
// Test: protected endpoints reject missing and garbage tokens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new();

    let response = get(app.app(), "/api/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.app(), "/api/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn me_returns_the_caller() {
    let app = TestApp::new();
    let (admin_id, token) = app.admin().await;

    let response = get_auth(app.app(), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], admin_id);
    assert_eq!(json["data"]["email"], ADMIN_EMAIL);
}

// ---------------------------------------------------------------------------
// Test: a token for a deleted account is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_for_missing_user_is_rejected() {
    let app = TestApp::new();
    let token = app.token_for(9_999);

    let response = get_auth(app.app(), "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: logout marks the user offline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_marks_user_offline() {
    let app = TestApp::new();
    app.admin().await;

    let token = body_json(login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_auth(app.app(), "/api/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logged out");

    let me = body_json(get_auth(app.app(), "/api/auth/me", &token).await).await;
    assert_eq!(me["data"]["isOnline"], false);
}

// ---------------------------------------------------------------------------
// Test: a deactivated account can no longer log in or use its token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deactivated_account_is_forbidden() {
    let app = TestApp::new();
    let org = app.org().await;

    let response = put_json_auth(
        app.app(),
        &format!("/api/users/{}", org.employee_id),
        json!({ "status": "inactive" }),
        &org.hr,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.app(), "/api/auth/me", &org.employee).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = login(&app, "evanemployee@company.com", "evanemployee@123").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
