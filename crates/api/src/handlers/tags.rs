//! Tag handlers: listing, create-or-get, search and bulk management.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use vitrine_core::error::CoreError;
use vitrine_core::types::DbId;
use vitrine_db::models::tag::{CreateTag, Tag, TagInfo, TagSearchParams};
use vitrine_db::repositories::tag_repo::normalize_tag_name;
use vitrine_db::repositories::{MediaRepo, TagRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::media::resolve_guids;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ManageTagsRequest {
    pub guids: Vec<String>,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub rem: Vec<String>,
}

/// Association rows actually changed by a manage call.
#[derive(Debug, Serialize)]
pub struct ManageTagsSummary {
    pub added: usize,
    pub removed: usize,
}

/// GET /tags
pub async fn list_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /tags
///
/// Create-or-get by normalized name: 201 with the new tag, or 200 with the
/// existing one.
pub async fn create_tag(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    let name = normalize_tag_name(&input.name);
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Tag name must not be empty".into(),
        )));
    }

    if let Some(existing) = TagRepo::find_by_name(&state.pool, &name).await? {
        return Ok((StatusCode::OK, Json(DataResponse { data: existing })));
    }

    let tag = TagRepo::create_or_get(&state.pool, &name, input.is_artist.unwrap_or(false)).await?;
    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /tags/search
pub async fn search_tags(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TagSearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.q.unwrap_or_default();
    let results = TagRepo::search(
        &state.pool,
        &q,
        params.non_zero.unwrap_or(false),
        params.exclude_artist.unwrap_or(false),
    )
    .await?;

    let mut data: Vec<TagInfo> = Vec::with_capacity(results.len() + 1);
    if params.include_search.unwrap_or(false) && !q.trim().is_empty() {
        // Pseudo-entry the frontend renders as a free-text search action.
        data.push(TagInfo {
            id: 0,
            name: format!("Search for: {}", q.trim()),
            is_artist: false,
        });
    }
    data.extend(results.into_iter().map(|tag| TagInfo {
        id: tag.id,
        name: tag.name,
        is_artist: tag.is_artist,
    }));

    Ok(Json(DataResponse { data }))
}

/// POST /tags/manage
///
/// Applies `add` and removes `rem` across every item named by `guids`.
pub async fn manage_tags(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ManageTagsRequest>,
) -> AppResult<impl IntoResponse> {
    let targets = resolve_guids(&state, &input.guids).await?;

    let mut added = 0;
    for token in &input.add {
        let Some(tag) = resolve_tag(&state, token).await? else {
            continue;
        };
        for &(kind, media_id) in &targets {
            if MediaRepo::add_tag(&state.pool, kind, media_id, tag.id).await? {
                added += 1;
            }
        }
    }

    let mut removed = 0;
    for token in &input.rem {
        let Some(tag) = resolve_tag(&state, token).await? else {
            continue;
        };
        for &(kind, media_id) in &targets {
            if MediaRepo::remove_tag(&state.pool, kind, media_id, tag.id).await? {
                removed += 1;
            }
        }
    }

    tracing::info!(
        user_id = auth.user_id,
        targets = targets.len(),
        added,
        removed,
        "Tags managed"
    );
    Ok(Json(DataResponse {
        data: ManageTagsSummary { added, removed },
    }))
}

/// Resolve one tag token: a numeric token is a tag id and must exist;
/// anything else is a name to create or get. Blank tokens resolve to
/// nothing.
pub(crate) async fn resolve_tag(state: &AppState, token: &str) -> Result<Option<Tag>, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(None);
    }

    if let Ok(id) = token.parse::<DbId>() {
        let tag = TagRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;
        return Ok(Some(tag));
    }

    Ok(Some(TagRepo::create_or_get(&state.pool, token, false).await?))
}
