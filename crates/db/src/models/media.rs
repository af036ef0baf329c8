//! Media entity models and DTOs.
//!
//! Images and videos live in separate tables with an identical column
//! layout, so one row struct serves both. The kind a row came from is
//! tracked by the caller, not stored on the row.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::feed::FeedItem;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `images` or `videos` table, with the author's username
/// joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaItem {
    pub id: DbId,
    pub guid: String,
    pub title: String,
    pub author_id: DbId,
    pub author: String,
    pub width: i32,
    pub height: i32,
    pub source_path: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FeedItem for MediaItem {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
    fn id(&self) -> DbId {
        self.id
    }
}

/// DTO for creating a new media item. The guid is derived from the
/// generated id by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMediaItem {
    pub title: String,
    pub author_id: DbId,
    pub width: i32,
    pub height: i32,
    pub source_path: String,
}

/// Join row linking a media item to one of its tags.
#[derive(Debug, Clone, FromRow)]
pub struct MediaTagRow {
    pub media_id: DbId,
    pub tag_id: DbId,
    pub name: String,
    pub is_artist: bool,
}
