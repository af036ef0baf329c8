//! Repository for the `images` and `videos` tables.
//!
//! Both tables share one column layout, so a single repository serves both;
//! every method takes the [`MediaKind`] whose table it touches. Feed queries
//! are assembled dynamically from filter buckets: tokens inside a bucket
//! become one parenthesized OR group, buckets are ANDed together.

use std::collections::HashMap;

use sqlx::PgPool;
use vitrine_core::filter::FilterBucket;
use vitrine_core::guid;
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;

use crate::escape_like;
use crate::models::media::{CreateMediaItem, MediaItem, MediaTagRow};
use crate::models::tag::TagInfo;

/// Column list for media queries. Expects the entity aliased as `m` and the
/// author row joined as `u`.
const MEDIA_COLUMNS: &str = "\
    m.id, m.guid, m.title, m.author_id, u.username AS author, \
    m.width, m.height, m.source_path, m.created_at, m.updated_at";

/// Typed parameter for dynamically assembled feed queries.
#[derive(Debug, Clone)]
enum QueryParam {
    Id(DbId),
    IdList(Vec<DbId>),
    Text(String),
}

/// Provides feed queries, lookup, tagging and soft delete for media items.
pub struct MediaRepo;

impl MediaRepo {
    // -----------------------------------------------------------------------
    // Feed queries
    // -----------------------------------------------------------------------

    /// Highest id ever assigned in the kind's table, deleted rows included.
    /// Returns 0 for an empty table.
    pub async fn max_id(pool: &PgPool, kind: MediaKind) -> Result<DbId, sqlx::Error> {
        let query = format!("SELECT COALESCE(MAX(id), 0) FROM {}", kind.entity_table());
        sqlx::query_scalar::<_, DbId>(&query).fetch_one(pool).await
    }

    /// Fetch live gallery members of one kind with id below `below_id`,
    /// matching every filter bucket, newest first (id descending on ties).
    ///
    /// `limit` caps the result when present; cursor-driven requests pass the
    /// page size here, explicit ranges fetch everything and slice in memory.
    pub async fn fetch_feed(
        pool: &PgPool,
        gallery_id: DbId,
        kind: MediaKind,
        buckets: &[FilterBucket],
        below_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<MediaItem>, sqlx::Error> {
        let table = kind.entity_table();
        let (member_table, member_fk) = kind.gallery_join();
        let (tag_table, tag_fk) = kind.tag_join();

        let mut params = vec![QueryParam::Id(gallery_id), QueryParam::Id(below_id)];
        let mut query = format!(
            "SELECT {MEDIA_COLUMNS} \
             FROM {table} m \
             JOIN users u ON u.id = m.author_id \
             JOIN {member_table} gm ON gm.{member_fk} = m.id AND gm.gallery_id = $1 \
             WHERE m.deleted_at IS NULL AND m.id < $2"
        );

        for bucket in buckets {
            let mut terms = Vec::new();

            let tag_ids = bucket.tag_ids();
            if !tag_ids.is_empty() {
                params.push(QueryParam::IdList(tag_ids));
                terms.push(format!(
                    "EXISTS (SELECT 1 FROM {tag_table} mt \
                     WHERE mt.{tag_fk} = m.id AND mt.tag_id = ANY(${}))",
                    params.len()
                ));
            }
            for text in bucket.text_tokens() {
                params.push(QueryParam::Text(format!("%{}%", escape_like(text))));
                terms.push(format!("m.title ILIKE ${}", params.len()));
            }

            if !terms.is_empty() {
                query.push_str(&format!(" AND ({})", terms.join(" OR ")));
            }
        }

        query.push_str(" ORDER BY m.created_at DESC, m.id DESC");
        if let Some(limit) = limit {
            params.push(QueryParam::Id(limit));
            query.push_str(&format!(" LIMIT ${}", params.len()));
        }

        let mut q = sqlx::query_as::<_, MediaItem>(&query);
        for param in &params {
            q = match param {
                QueryParam::Id(v) => q.bind(v),
                QueryParam::IdList(v) => q.bind(v),
                QueryParam::Text(v) => q.bind(v),
            };
        }
        q.fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Lookup and lifecycle
    // -----------------------------------------------------------------------

    /// Find a live media item by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: MediaKind,
        id: DbId,
    ) -> Result<Option<MediaItem>, sqlx::Error> {
        let query = format!(
            "SELECT {MEDIA_COLUMNS} \
             FROM {} m \
             JOIN users u ON u.id = m.author_id \
             WHERE m.id = $1 AND m.deleted_at IS NULL",
            kind.entity_table()
        );
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a media item. The guid is derived from the generated id and
    /// backfilled inside the same transaction.
    pub async fn create(
        pool: &PgPool,
        kind: MediaKind,
        dto: &CreateMediaItem,
    ) -> Result<MediaItem, sqlx::Error> {
        let table = kind.entity_table();

        let mut tx = pool.begin().await?;
        let insert = format!(
            "INSERT INTO {table} (title, author_id, width, height, source_path) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id"
        );
        let id: DbId = sqlx::query_scalar(&insert)
            .bind(&dto.title)
            .bind(dto.author_id)
            .bind(dto.width)
            .bind(dto.height)
            .bind(&dto.source_path)
            .fetch_one(&mut *tx)
            .await?;

        let backfill = format!("UPDATE {table} SET guid = $1 WHERE id = $2");
        sqlx::query(&backfill)
            .bind(guid::encode(kind, id))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        let query = format!(
            "SELECT {MEDIA_COLUMNS} \
             FROM {table} m \
             JOIN users u ON u.id = m.author_id \
             WHERE m.id = $1"
        );
        sqlx::query_as::<_, MediaItem>(&query)
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Soft-delete a media item. Returns `false` if the item does not exist
    /// or is already deleted.
    pub async fn soft_delete(pool: &PgPool, kind: MediaKind, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
            kind.entity_table()
        );
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Tag associations
    // -----------------------------------------------------------------------

    /// Apply a tag to a media item. Idempotent: does nothing if already
    /// applied.
    pub async fn add_tag(
        pool: &PgPool,
        kind: MediaKind,
        media_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (tag_table, tag_fk) = kind.tag_join();
        let query = format!(
            "INSERT INTO {tag_table} ({tag_fk}, tag_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(media_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a tag from a media item.
    pub async fn remove_tag(
        pool: &PgPool,
        kind: MediaKind,
        media_id: DbId,
        tag_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (tag_table, tag_fk) = kind.tag_join();
        let query = format!("DELETE FROM {tag_table} WHERE {tag_fk} = $1 AND tag_id = $2");
        let result = sqlx::query(&query)
            .bind(media_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all tags for a single media item, sorted by name.
    pub async fn tags_for_item(
        pool: &PgPool,
        kind: MediaKind,
        media_id: DbId,
    ) -> Result<Vec<TagInfo>, sqlx::Error> {
        let (tag_table, tag_fk) = kind.tag_join();
        let query = format!(
            "SELECT t.id, t.name, t.is_artist \
             FROM {tag_table} mt \
             JOIN tags t ON t.id = mt.tag_id \
             WHERE mt.{tag_fk} = $1 \
             ORDER BY t.name"
        );
        sqlx::query_as::<_, TagInfo>(&query)
            .bind(media_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch tags for many media items in one query, grouped by item id.
    /// Items without tags are absent from the map.
    pub async fn tags_for_items(
        pool: &PgPool,
        kind: MediaKind,
        ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<TagInfo>>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let (tag_table, tag_fk) = kind.tag_join();
        let query = format!(
            "SELECT mt.{tag_fk} AS media_id, t.id AS tag_id, t.name, t.is_artist \
             FROM {tag_table} mt \
             JOIN tags t ON t.id = mt.tag_id \
             WHERE mt.{tag_fk} = ANY($1) \
             ORDER BY t.name"
        );
        let rows = sqlx::query_as::<_, MediaTagRow>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<TagInfo>> = HashMap::new();
        for row in rows {
            grouped.entry(row.media_id).or_default().push(TagInfo {
                id: row.tag_id,
                name: row.name,
                is_artist: row.is_artist,
            });
        }
        Ok(grouped)
    }
}
