//! Handlers for individual media items, addressed by GUID.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use vitrine_core::error::CoreError;
use vitrine_core::guid;
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;
use vitrine_db::repositories::MediaRepo;

use crate::engine::FeedEntry;
use crate::error::{AppError, AppResult};
use crate::handlers::tags::resolve_tag;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TagMediaRequest {
    pub tags: Vec<String>,
}

/// GET /media/{guid}
pub async fn get_media(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_guid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = fetch_entry(&state, &raw_guid).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /media/{guid}/tags
pub async fn tag_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_guid): Path<String>,
    Json(input): Json<TagMediaRequest>,
) -> AppResult<impl IntoResponse> {
    let (kind, id) = resolve_guid(&state, &raw_guid).await?;

    for token in &input.tags {
        let Some(tag) = resolve_tag(&state, token).await? else {
            continue;
        };
        MediaRepo::add_tag(&state.pool, kind, id, tag.id).await?;
    }

    let tags = MediaRepo::tags_for_item(&state.pool, kind, id).await?;
    tracing::info!(
        user_id = auth.user_id,
        guid = %raw_guid,
        tag_count = tags.len(),
        "Media tags applied"
    );
    Ok(Json(DataResponse { data: tags }))
}

/// DELETE /media/{guid}
///
/// Soft delete: the item leaves every feed but keeps its id, so session
/// cursors pointing at it stay valid. Returns the item as it was.
pub async fn delete_media(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_guid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = fetch_entry(&state, &raw_guid).await?;
    MediaRepo::soft_delete(&state.pool, entry.kind, entry.item.id).await?;

    tracing::info!(user_id = auth.user_id, guid = %raw_guid, "Media item deleted");
    Ok(Json(DataResponse { data: entry }))
}

/// Parse a GUID and verify it names a live item.
async fn resolve_guid(state: &AppState, raw: &str) -> Result<(MediaKind, DbId), AppError> {
    let (kind, id) = guid::parse(raw)?;
    MediaRepo::find_by_id(&state.pool, kind, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: kind.entity_name(),
            id,
        }))?;
    Ok((kind, id))
}

/// Resolve a batch of GUIDs to (kind, id) pairs, verifying each names a
/// live item. Used by every endpoint that takes `{guids: [..]}`.
pub(crate) async fn resolve_guids(
    state: &AppState,
    guids: &[String],
) -> Result<Vec<(MediaKind, DbId)>, AppError> {
    let mut resolved = Vec::with_capacity(guids.len());
    for raw in guids {
        resolved.push(resolve_guid(state, raw).await?);
    }
    Ok(resolved)
}

async fn fetch_entry(state: &AppState, raw: &str) -> Result<FeedEntry, AppError> {
    let (kind, id) = guid::parse(raw)?;
    let item = MediaRepo::find_by_id(&state.pool, kind, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: kind.entity_name(),
            id,
        }))?;
    let tags = MediaRepo::tags_for_item(&state.pool, kind, id).await?;

    Ok(FeedEntry { kind, item, tags })
}
