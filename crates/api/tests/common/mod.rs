#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use clinica_api::auth::jwt::JwtConfig;
use clinica_api::auth::password::hash_password;
use clinica_api::cache::ContentCache;
use clinica_api::config::ServerConfig;
use clinica_api::router::build_app_router;
use clinica_api::state::AppState;
use clinica_core::roles::{ROLE_ADMIN, ROLE_USER};
use clinica_db::models::user::{CreateUser, User};
use clinica_db::repositories::UserRepo;
use clinica_storage::memory::MemoryStore;
use clinica_storage::StorageConfig;

pub const PUBLIC_URL: &str = "http://test.local/storage";
pub const TEST_PASSWORD: &str = "senha-de-teste-123";

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
///
/// The content cache TTL is zero so every read sees the latest write.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        content_cache_ttl_secs: 0,
        upload_max_bytes: 2 * 1024 * 1024,
        upload_max_dimension: 400,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        storage: StorageConfig::memory(PUBLIC_URL),
    }
}

/// Build the full application router (same middleware stack as production)
/// and hand back the in-memory store so tests can inspect it.
pub fn build_test_app_with_store(pool: PgPool) -> (Router, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::new(PUBLIC_URL.to_string()));

    let state = AppState {
        pool,
        content: Arc::new(ContentCache::new(Duration::from_secs(
            config.content_cache_ttl_secs,
        ))),
        storage: store.clone(),
        config: Arc::new(config.clone()),
    };

    (build_app_router(state, &config), store)
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_store(pool).0
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] holding `admin` or the plain `user` role.
pub async fn create_user(pool: &PgPool, email: &str, admin: bool) -> User {
    let input = CreateUser {
        email: email.to_string(),
        display_name: None,
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
    };
    let role = if admin { ROLE_ADMIN } else { ROLE_USER };
    UserRepo::create_with_role(pool, &input, role)
        .await
        .expect("user creation should succeed")
        .expect("roles are seeded")
}

/// Log in through the API and return the full auth response.
pub async fn login(app: Router, email: &str, password: &str) -> Value {
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Create an admin user and return an access token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    admin_token_for(pool, "admin@clinica.test").await.1
}

pub async fn admin_token_for(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, true).await;
    let json = login(build_test_app(pool.clone()), email, TEST_PASSWORD).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    (user, token)
}

/// Create a regular (non-admin) user and return an access token for it.
pub async fn user_token(pool: &PgPool) -> String {
    create_user(pool, "editor@clinica.test", false).await;
    let json = login(build_test_app(pool.clone()), "editor@clinica.test", TEST_PASSWORD).await;
    json["access_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Send a raw request, for bodies the JSON helpers cannot express.
pub async fn send_raw(app: Router, request: Request<Body>) -> Response {
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "clinica-test-boundary";

/// Encode a `file` part plus plain text fields as `multipart/form-data`.
pub fn multipart_body(file: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.png\"\r\n\
             Content-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(app: Router, uri: &str, token: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// A small solid-colour PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
