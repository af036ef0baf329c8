//! Integration tests for login provisioning, token checks and logout.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use vitrine_core::media::MediaKind;

#[sqlx::test(migrations = "../db/migrations")]
async fn login_provisions_user_and_artist_tag(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({
            "email": "Ada.Lovelace@Example.COM",
            "first_name": "Ada",
            "last_name": "Lovelace",
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;

    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["user"]["username"], "ada.lovelace");
    assert_eq!(body["user"]["email"], "ada.lovelace@example.com");
    assert_eq!(body["user"]["first_name"], "Ada");

    // The account's artist tag is created alongside the user.
    let token = body["access_token"].as_str().unwrap();
    let tags = common::body_json(common::get(&app, "/api/v1/tags", token).await).await;
    let artist = &tags["data"][0];
    assert_eq!(artist["name"], "ada lovelace");
    assert_eq!(artist["is_artist"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_rejects_malformed_emails(pool: PgPool) {
    let app = common::build_test_app(pool);

    for email in ["not-an-email", "@example.com", "   "] {
        let response = common::request(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "email {email:?}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn repeated_login_reuses_the_account(pool: PgPool) {
    let app = common::build_test_app(pool);

    let first = common::request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "grace@example.com", "first_name": "Grace" })),
    )
    .await;
    let first = common::body_json(first).await;

    let second = common::request(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "GRACE@example.com", "last_name": "Hopper" })),
    )
    .await;
    let second = common::body_json(second).await;

    assert_eq!(second["user"]["id"], first["user"]["id"]);
    // Absent name fields keep their stored values.
    assert_eq!(second["user"]["first_name"], "Grace");
    assert_eq!(second["user"]["last_name"], "Hopper");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn requests_without_a_valid_token_are_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let missing = common::request(&app, Method::GET, "/api/v1/galleries", None, None).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    let body = common::body_json(missing).await;
    assert_eq!(body["code"], "UNAUTHORIZED");

    let garbage = common::get(&app, "/api/v1/galleries", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_resets_paging(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (token, user_id) = common::login(&app, "curator@example.com").await;
    let gallery = common::create_gallery(&app, &token, "walks").await;
    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "a", 1000).await;
    common::seed_item(&pool, gallery, MediaKind::Image, user_id, "b", 2000).await;

    let browse_uri = format!("/api/v1/galleries/{gallery}/browse");
    let first = common::body_json(common::get(&app, &browse_uri, &token).await).await;
    assert_eq!(first["count"], 2);

    let more_uri = format!("{browse_uri}?more=true");
    let drained = common::body_json(common::get(&app, &more_uri, &token).await).await;
    assert_eq!(drained["count"], 0);

    let logout = common::request(&app, Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    // With the cursors gone, a continuation starts from the top again.
    let fresh = common::body_json(common::get(&app, &more_uri, &token).await).await;
    assert_eq!(fresh["count"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn health_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
}
