//! Tag models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `tags` table. `name` is stored normalized (trimmed,
/// lowercased).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub is_artist: bool,
    pub created_at: Timestamp,
}

/// Compact tag shape attached to media items and search results.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagInfo {
    pub id: DbId,
    pub name: String,
    pub is_artist: bool,
}

/// DTO for creating a new tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub is_artist: Option<bool>,
}

/// Query parameters for tag search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagSearchParams {
    pub q: Option<String>,
    /// Append a pseudo-entry offering a free-text title search for `q`.
    pub include_search: Option<bool>,
    /// Only return tags attached to at least one live media item.
    pub non_zero: Option<bool>,
    pub exclude_artist: Option<bool>,
}
