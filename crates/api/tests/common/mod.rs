#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use action_bank_api::auth::jwt::{generate_token, JwtConfig};
use action_bank_api::auth::password::hash_password;
use action_bank_api::config::ServerConfig;
use action_bank_api::middleware::auth::AuthUser;
use action_bank_api::router::build_app_router;
use action_bank_api::state::AppState;
use action_bank_core::roles::UserTypeMap;
use action_bank_core::user::{NewUser, User};

/// Password given to every user created by [`seed_user_with_password`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(data_location: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_location,
        password_reset_timeout_mins: 15,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 1,
        },
    }
}

/// A fresh data directory and the state opened on it. Keep the `TempDir`
/// alive for the duration of the test.
pub async fn test_state() -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(dir.path().to_path_buf());
    let user_types = Arc::new(UserTypeMap::default());
    let store = action_bank_db::open_data_store(dir.path(), Arc::clone(&user_types))
        .await
        .expect("data store should open");
    (dir, AppState::new(store, user_types, config))
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(state: &AppState) -> Router {
    build_app_router(state.clone(), &state.config)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn insert_user(state: &AppState, username: &str, user_type: &str, hash: String) -> User {
    state
        .users
        .add_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            first_name: String::new(),
            last_name: String::new(),
            user_type: state.user_types.get(user_type).unwrap().clone(),
            password_hash: hash,
            user_meta: Map::new(),
            enabled: true,
        })
        .await
        .expect("user creation should succeed")
}

/// Insert a user directly into storage. The stored hash is not a real
/// password hash; use [`seed_user_with_password`] when a test logs in.
pub async fn seed_user(state: &AppState, username: &str, user_type: &str) -> User {
    insert_user(state, username, user_type, "unusable".to_string()).await
}

/// Insert a user whose password is [`TEST_PASSWORD`].
pub async fn seed_user_with_password(state: &AppState, username: &str, user_type: &str) -> User {
    let hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    insert_user(state, username, user_type, hash).await
}

/// The resolver-level caller for `user`.
pub fn caller(user: &User) -> AuthUser {
    AuthUser {
        user_id: user.id.clone(),
        username: user.fields.username.clone(),
        user_type: user.user_type().name().to_string(),
    }
}

/// A valid Bearer token for `user`.
pub fn token_for(state: &AppState, user: &User) -> String {
    generate_token(
        &user.id,
        &user.fields.username,
        user.user_type().name(),
        &state.config.jwt,
    )
    .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// Send a request with an optional Bearer token and optional JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
