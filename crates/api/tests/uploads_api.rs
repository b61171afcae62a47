//! Image uploads: raw bucket uploads, doctor photos and institute covers.

mod common;

use axum::http::StatusCode;
use clinica_storage::Bucket;
use common::{
    body_json, delete_auth, multipart_body, png_bytes, post_json_auth, post_multipart_auth,
};
use serde_json::json;
use sqlx::PgPool;

fn object_name(url: &str) -> String {
    url.rsplit('/').next().unwrap().to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn raw_upload_returns_location(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_multipart_auth(
        app,
        "/api/v1/admin/uploads/site-images",
        &token,
        multipart_body(&png_bytes(64, 48), &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let path = json["data"]["path"].as_str().unwrap();
    let url = json["data"]["url"].as_str().unwrap();
    assert!(path.ends_with(".jpg"));
    assert_eq!(url, format!("{}/site-images/{path}", common::PUBLIC_URL));

    let object = store.get(Bucket::SiteImages, path).expect("object stored");
    assert_eq!(object.content_type, "image/jpeg");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn crop_fields_shape_the_output(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_multipart_auth(
        app,
        "/api/v1/admin/uploads/site-images",
        &token,
        multipart_body(
            &png_bytes(100, 80),
            &[
                ("crop_x", "10"),
                ("crop_y", "10"),
                ("crop_width", "50"),
                ("crop_height", "40"),
            ],
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let path = json["data"]["path"].as_str().unwrap();

    let object = store.get(Bucket::SiteImages, path).unwrap();
    let decoded = image::load_from_memory(&object.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 40));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn partial_crop_rectangle_is_400(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_multipart_auth(
        app,
        "/api/v1/admin/uploads/site-images",
        &token,
        multipart_body(&png_bytes(10, 10), &[("crop_x", "1")]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_bucket_is_400(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_multipart_auth(
        app,
        "/api/v1/admin/uploads/private",
        &token,
        multipart_body(&png_bytes(10, 10), &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_image_file_is_rejected(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_multipart_auth(
        app,
        "/api/v1/admin/uploads/site-images",
        &token,
        multipart_body(b"definitely not an image", &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn raw_delete_is_best_effort(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = delete_auth(app, "/api/v1/admin/uploads/convenio-logos/gone.png", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        store.deleted(),
        vec![(Bucket::ConvenioLogos, "gone.png".to_string())]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn doctor_photo_upload_replace_and_delete(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/doctors",
        &token,
        json!({ "name": "Dra. Ana", "specialty": "Pediatra" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let photo_uri = format!("/api/v1/admin/doctors/{id}/photo");

    // First upload.
    let response = post_multipart_auth(
        app.clone(),
        &photo_uri,
        &token,
        multipart_body(&png_bytes(40, 40), &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first_url = body_json(response).await["data"]["photo_url"]
        .as_str()
        .unwrap()
        .to_string();
    let first = object_name(&first_url);
    assert!(store.contains(Bucket::SiteImages, &first));

    // Replacement discards the previous object.
    let response = post_multipart_auth(
        app.clone(),
        &photo_uri,
        &token,
        multipart_body(&png_bytes(40, 40), &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second_url = body_json(response).await["data"]["photo_url"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first_url, second_url);
    assert_eq!(store.deleted(), vec![(Bucket::SiteImages, first.clone())]);

    // Delete clears the URL and discards the stored object.
    let response = delete_auth(app, &photo_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["photo_url"].is_null());
    assert_eq!(
        store.deleted(),
        vec![
            (Bucket::SiteImages, first),
            (Bucket::SiteImages, object_name(&second_url)),
        ]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_upload_keeps_previous_cover(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/institutes",
        &token,
        json!({ "name": "Cardiologia" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let cover_uri = format!("/api/v1/admin/institutes/{id}/cover");

    let response = post_multipart_auth(
        app.clone(),
        &cover_uri,
        &token,
        multipart_body(&png_bytes(30, 20), &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cover = body_json(response).await["data"]["cover_image_url"].clone();
    assert!(cover.is_string());

    let response = post_multipart_auth(
        app.clone(),
        &cover_uri,
        &token,
        multipart_body(b"garbage", &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.deleted().is_empty());

    let response = common::get_auth(app, &format!("/api/v1/admin/institutes/{id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["cover_image_url"], cover);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn photo_for_missing_doctor_is_404(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let (app, store) = common::build_test_app_with_store(pool);

    let response = post_multipart_auth(
        app,
        "/api/v1/admin/doctors/999999/photo",
        &token,
        multipart_body(&png_bytes(10, 10), &[]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(store.is_empty());
}
