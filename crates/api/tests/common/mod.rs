#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use hrflow_api::auth::jwt::{issue_token, JwtConfig};
use hrflow_api::bootstrap::seed_admin;
use hrflow_api::config::{BootstrapAdmin, ServerConfig, StoreBackend};
use hrflow_api::router::build_app_router;
use hrflow_api::state::AppState;
use hrflow_core::types::DbId;
use hrflow_db::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "root@company.com";
pub const ADMIN_PASSWORD: &str = "root-password";

/// Build a test `ServerConfig` over the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig::new(TEST_SECRET),
        store_backend: StoreBackend::Memory,
        database_url: None,
        credential_domain: "company.com".to_string(),
        meeting_base_url: "https://meet.test".to_string(),
        bootstrap_admin: None,
    }
}

/// The application under test plus direct access to its state.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// A fresh router and empty store, using the production middleware stack.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()), config.clone());
        let router = build_app_router(state.clone(), &config);
        Self { router, state }
    }

    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Seed the bootstrap admin and return its id and a bearer token.
    pub async fn admin(&self) -> (DbId, String) {
        let admin = BootstrapAdmin {
            name: "Root Admin".into(),
            email: ADMIN_EMAIL.into(),
            password: ADMIN_PASSWORD.into(),
        };
        let user = match seed_admin(self.state.store.as_ref(), &admin).await.unwrap() {
            Some(user) => user,
            None => self.state.store.oldest_admin().await.unwrap().unwrap(),
        };
        (user.id, self.token_for(user.id))
    }

    pub fn token_for(&self, user_id: DbId) -> String {
        issue_token(user_id, &self.state.config.jwt).unwrap()
    }

    /// Create an account through the API as `token`'s user and return its
    /// id and a bearer token for it.
    pub async fn create_user(&self, token: &str, name: &str) -> (DbId, String) {
        let response = post_json_auth(
            self.app(),
            "/api/users",
            serde_json::json!({ "name": name }),
            token,
        )
        .await;
        assert_eq!(response.status(), 201, "creating {name} should succeed");
        let json = body_json(response).await;
        let id = json["data"]["user"]["id"].as_i64().unwrap();
        (id, self.token_for(id))
    }

    /// Admin, one hr and one employee created by that hr.
    pub async fn org(&self) -> Org {
        let (admin_id, admin) = self.admin().await;
        let (hr_id, hr) = self.create_user(&admin, "Helen Hr").await;
        let (employee_id, employee) = self.create_user(&hr, "Evan Employee").await;
        Org {
            admin_id,
            admin,
            hr_id,
            hr,
            employee_id,
            employee,
        }
    }
}

/// Ids and tokens of a minimal admin -> hr -> employee chain.
pub struct Org {
    pub admin_id: DbId,
    pub admin: String,
    pub hr_id: DbId,
    pub hr: String,
    pub employee_id: DbId,
    pub employee: String,
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body, Some(token))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::POST, uri, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body, Some(token))).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::PUT, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}
