#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use gigboard_api::auth::jwt::JwtConfig;
use gigboard_api::auth::password::hash_password;
use gigboard_api::config::ServerConfig;
use gigboard_api::router::build_app_router;
use gigboard_api::state::AppState;
use gigboard_api::ws::WsManager;
use gigboard_core::roles::Role;
use gigboard_db::models::user::CreateUser;
use gigboard_db::repositories::UserRepo;
use gigboard_events::EventBus;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the state a test app runs on. Tests that inspect published events
/// subscribe to `state.event_bus` before sending requests.
pub fn build_test_state(pool: PgPool) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// The production router and middleware stack over a fresh state.
pub fn build_test_app(pool: PgPool) -> Router {
    app_for(build_test_state(pool))
}

pub fn app_for(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request("GET", uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("GET", uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request("POST", uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("POST", uri, Some(token), body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("POST", uri, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request("PUT", uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request("DELETE", uri, Some(token))).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register through the API and return `(user_id, access_token)`.
pub async fn register(app: Router, username: &str, role: &str) -> (i64, String) {
    let body = serde_json::json!({
        "username": username,
        "email": format!("{username}@test.com"),
        "password": TEST_PASSWORD,
        "role": role,
    });
    let json = expect_json(
        post_json(app, "/api/v1/auth/register", body).await,
        StatusCode::CREATED,
    )
    .await;
    (
        json["user"]["id"].as_i64().unwrap(),
        json["access_token"].as_str().unwrap().to_string(),
    )
}

/// Admins cannot self-register; insert one directly and log in.
pub async fn create_admin(pool: &PgPool, app: Router, username: &str) -> (i64, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: Role::Admin,
        },
    )
    .await
    .unwrap();

    let body = serde_json::json!({ "email": user.email, "password": TEST_PASSWORD });
    let json = expect_json(
        post_json(app, "/api/v1/auth/login", body).await,
        StatusCode::OK,
    )
    .await;
    (user.id, json["access_token"].as_str().unwrap().to_string())
}

// ---------------------------------------------------------------------------
// Marketplace helpers
// ---------------------------------------------------------------------------

pub async fn create_project(app: Router, token: &str, title: &str, budget: f64) -> i64 {
    let body = serde_json::json!({
        "title": title,
        "description": format!("{title} description"),
        "budget": budget,
        "skills": ["rust", "sql"],
    });
    let json = expect_json(
        post_json_auth(app, "/api/v1/projects", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    json["id"].as_i64().unwrap()
}

pub async fn apply(app: Router, token: &str, project_id: i64, bid: f64) -> i64 {
    let body = serde_json::json!({
        "project_id": project_id,
        "proposal": "I can build this",
        "bid": bid,
    });
    let json = expect_json(
        post_json_auth(app, "/api/v1/applications", body, token).await,
        StatusCode::CREATED,
    )
    .await;
    json["id"].as_i64().unwrap()
}

pub async fn accept(app: Router, token: &str, application_id: i64) -> serde_json::Value {
    expect_json(
        post_auth(app, &format!("/api/v1/applications/{application_id}/accept"), token).await,
        StatusCode::OK,
    )
    .await
}
