//! Shared helpers for API integration tests.
//!
//! Builds the production router against a per-test database and drives it
//! with in-process requests, no listening socket involved.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use vitrine_api::auth::jwt::JwtConfig;
use vitrine_api::config::ServerConfig;
use vitrine_api::router::build_app_router;
use vitrine_api::state::AppState;
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;
use vitrine_db::models::media::{CreateMediaItem, MediaItem};
use vitrine_db::repositories::{GalleryRepo, MediaRepo};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over the given pool, with the same
/// middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send one request through the router. `token` adds a Bearer header,
/// `body` is sent as JSON.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Response {
    request(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    request(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    request(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response {
    request(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn delete_json(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    request(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Log in (provisioning the account on first use) and return the access
/// token and user id.
pub async fn login(app: &Router, email: &str) -> (String, DbId) {
    let response = request(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_i64().unwrap();
    (token, user_id)
}

/// Create a gallery through the API and return its id.
pub async fn create_gallery(app: &Router, token: &str, title: &str) -> DbId {
    let response = post_json(app, "/api/v1/galleries", token, json!({ "title": title })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a media item, pin its creation time and put it in the gallery.
pub async fn seed_item(
    pool: &PgPool,
    gallery_id: DbId,
    kind: MediaKind,
    author_id: DbId,
    title: &str,
    epoch_secs: i64,
) -> MediaItem {
    let item = MediaRepo::create(
        pool,
        kind,
        &CreateMediaItem {
            title: title.to_string(),
            author_id,
            width: 0,
            height: 0,
            source_path: String::new(),
        },
    )
    .await
    .unwrap();

    let query = format!(
        "UPDATE {} SET created_at = to_timestamp($1) WHERE id = $2",
        kind.entity_table()
    );
    sqlx::query(&query)
        .bind(epoch_secs as f64)
        .bind(item.id)
        .execute(pool)
        .await
        .unwrap();

    GalleryRepo::add_item(pool, gallery_id, kind, item.id)
        .await
        .unwrap();
    item
}

/// Guids of a browse page, in order.
pub fn page_guids(body: &Value) -> Vec<String> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["guid"].as_str().unwrap().to_string())
        .collect()
}
