//! Gallery handlers: listing, create-or-get, membership and the browse feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use vitrine_core::error::CoreError;
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;
use vitrine_db::models::gallery::{CreateGallery, Gallery, ModifyGalleryItems};
use vitrine_db::repositories::GalleryRepo;

use crate::engine::{self, BrowseParams, BrowseResponse};
use crate::error::{AppError, AppResult};
use crate::handlers::media::resolve_guids;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Gallery plus live item counts per kind.
#[derive(Debug, Serialize)]
pub struct GalleryDetail {
    #[serde(flatten)]
    pub gallery: Gallery,
    pub image_count: i64,
    pub video_count: i64,
}

/// Membership rows actually changed by an items call.
#[derive(Debug, Serialize)]
pub struct ItemsChanged {
    pub changed: usize,
}

/// GET /galleries
pub async fn list_galleries(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let galleries = GalleryRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: galleries }))
}

/// POST /galleries
///
/// Create-or-get by title: 201 with the new gallery, or 200 with the
/// existing one.
pub async fn create_gallery(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateGallery>,
) -> AppResult<impl IntoResponse> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Gallery title must not be empty".into(),
        )));
    }

    if let Some(existing) = GalleryRepo::find_by_title(&state.pool, title).await? {
        return Ok((StatusCode::OK, Json(DataResponse { data: existing })));
    }

    let gallery = GalleryRepo::create(&state.pool, title, auth.user_id).await?;
    tracing::info!(
        gallery_id = gallery.id,
        title = %gallery.title,
        owner_id = auth.user_id,
        "Gallery created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: gallery })))
}

/// GET /galleries/{id}
pub async fn get_gallery(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let gallery = ensure_gallery(&state, id).await?;

    let image_count = GalleryRepo::count_items(&state.pool, id, MediaKind::Image).await?;
    let video_count = GalleryRepo::count_items(&state.pool, id, MediaKind::Video).await?;

    Ok(Json(DataResponse {
        data: GalleryDetail {
            gallery,
            image_count,
            video_count,
        },
    }))
}

/// PUT /galleries/{id}/items
pub async fn add_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ModifyGalleryItems>,
) -> AppResult<impl IntoResponse> {
    let gallery = ensure_gallery(&state, id).await?;

    let mut changed = 0;
    for (kind, media_id) in resolve_guids(&state, &input.guids).await? {
        if GalleryRepo::add_item(&state.pool, gallery.id, kind, media_id).await? {
            changed += 1;
        }
    }

    tracing::info!(
        gallery_id = gallery.id,
        user_id = auth.user_id,
        changed,
        "Gallery items added"
    );
    Ok(Json(DataResponse {
        data: ItemsChanged { changed },
    }))
}

/// DELETE /galleries/{id}/items
pub async fn remove_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ModifyGalleryItems>,
) -> AppResult<impl IntoResponse> {
    let gallery = ensure_gallery(&state, id).await?;

    let mut changed = 0;
    for (kind, media_id) in resolve_guids(&state, &input.guids).await? {
        if GalleryRepo::remove_item(&state.pool, gallery.id, kind, media_id).await? {
            changed += 1;
        }
    }

    tracing::info!(
        gallery_id = gallery.id,
        user_id = auth.user_id,
        changed,
        "Gallery items removed"
    );
    Ok(Json(DataResponse {
        data: ItemsChanged { changed },
    }))
}

/// GET /galleries/{id}/browse
pub async fn browse_gallery(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<BrowseParams>,
) -> AppResult<Json<BrowseResponse>> {
    ensure_gallery(&state, id).await?;

    let response = engine::browse(&state.pool, &state.sessions, auth.user_id, id, &params).await?;
    Ok(Json(response))
}

async fn ensure_gallery(state: &AppState, id: DbId) -> Result<Gallery, AppError> {
    GalleryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Gallery",
            id,
        }))
}
