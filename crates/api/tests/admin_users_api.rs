//! The `POST /admin/users` user-management function.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use common::{body_json, post_json, post_json_auth, send_raw, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

const URI: &str = "/api/v1/admin/users";

#[sqlx::test(migrations = "../db/migrations")]
async fn no_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, URI, json!({ "action": "list" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_is_403_even_with_bad_payload(pool: PgPool) {
    let editor = common::user_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(app, URI, &editor, json!({ "action": "nope" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_returns_only_admins(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    common::create_user(&pool, "editor@clinica.test", false).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, URI, &token, json!({ "action": "list" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let emails: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["admin@clinica.test"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_grants_admin_and_allows_login(pool: PgPool) {
    let token = common::admin_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        URI,
        &token,
        json!({
            "action": "create",
            "email": "nova@clinica.test",
            "password": TEST_PASSWORD,
            "display_name": "Nova Admin",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "nova@clinica.test");
    assert_eq!(json["data"]["display_name"], "Nova Admin");

    let app = common::build_test_app(pool);
    let login = common::login(app, "nova@clinica.test", TEST_PASSWORD).await;
    assert_eq!(login["is_admin"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_validates_fields(pool: PgPool) {
    let token = common::admin_token(&pool).await;

    let cases = [
        json!({ "action": "create", "password": TEST_PASSWORD }),
        json!({ "action": "create", "email": "x@clinica.test" }),
        json!({ "action": "create", "email": "not-an-email", "password": TEST_PASSWORD }),
        json!({ "action": "create", "email": "x@clinica.test", "password": "curta" }),
    ];
    for body in cases {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, URI, &token, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload: {body}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_duplicate_email_is_409(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        URI,
        &token,
        json!({ "action": "create", "email": "ADMIN@clinica.test", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_user(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let other = common::create_user(&pool, "outra@clinica.test", true).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        URI,
        &token,
        json!({ "action": "delete", "user_id": other.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["user_id"], other.id);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        URI,
        &token,
        json!({ "action": "delete", "user_id": other.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_self_is_400(pool: PgPool) {
    let (admin, token) = common::admin_token_for(&pool, "admin@clinica.test").await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        URI,
        &token,
        json!({ "action": "delete", "user_id": admin.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_or_unknown_action_is_400(pool: PgPool) {
    let token = common::admin_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, URI, &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, URI, &token, json!({ "action": "promote" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::POST)
        .uri(URI)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("not json"))
        .unwrap();
    let response = send_raw(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
