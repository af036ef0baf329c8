//! Repository for the `tags` table.
//!
//! Tag names are stored normalized (trimmed, lowercased); creation is
//! idempotent on the normalized name. Associations between tags and media
//! items live in [`MediaRepo`](crate::repositories::MediaRepo).

use sqlx::PgPool;
use vitrine_core::types::DbId;

use crate::escape_like;
use crate::models::tag::Tag;

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, is_artist, created_at";

/// Provides CRUD operations and search for tags.
pub struct TagRepo;

impl TagRepo {
    /// Create a tag or return the existing one with the same normalized name.
    ///
    /// Uses `ON CONFLICT` for idempotent creation. An existing tag keeps its
    /// `is_artist` flag.
    pub async fn create_or_get(
        pool: &PgPool,
        name: &str,
        is_artist: bool,
    ) -> Result<Tag, sqlx::Error> {
        let normalized = normalize_tag_name(name);
        let query = format!(
            "INSERT INTO tags (name, is_artist) \
             VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {TAG_COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&normalized)
            .bind(is_artist)
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by its normalized name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE name = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(normalize_tag_name(name))
            .fetch_optional(pool)
            .await
    }

    /// List all tags sorted by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Search tags by substring match on the name.
    ///
    /// `non_zero` keeps only tags attached to at least one live media item;
    /// `exclude_artist` drops artist tags.
    pub async fn search(
        pool: &PgPool,
        q: &str,
        non_zero: bool,
        exclude_artist: bool,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let mut query = format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.name ILIKE $1");
        if exclude_artist {
            query.push_str(" AND t.is_artist = FALSE");
        }
        if non_zero {
            query.push_str(
                " AND (EXISTS (SELECT 1 FROM image_tags it \
                       JOIN images i ON i.id = it.image_id AND i.deleted_at IS NULL \
                       WHERE it.tag_id = t.id) \
                   OR EXISTS (SELECT 1 FROM video_tags vt \
                       JOIN videos v ON v.id = vt.video_id AND v.deleted_at IS NULL \
                       WHERE vt.tag_id = t.id))",
            );
        }
        query.push_str(" ORDER BY t.name");

        let pattern = format!("%{}%", escape_like(q.trim()));
        sqlx::query_as::<_, Tag>(&query)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }
}

/// Normalize a tag name: trim whitespace and lowercase.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}
