//! Repository for the `galleries` table and gallery membership.

use sqlx::PgPool;
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;

use crate::models::gallery::Gallery;

/// Column list for `galleries` queries.
const GALLERY_COLUMNS: &str = "id, title, owner_id, created_at, updated_at";

/// Provides CRUD operations for galleries and their media membership.
pub struct GalleryRepo;

impl GalleryRepo {
    /// Create a gallery. Titles are unique; a duplicate surfaces as a
    /// unique-violation error.
    pub async fn create(pool: &PgPool, title: &str, owner_id: DbId) -> Result<Gallery, sqlx::Error> {
        let query = format!(
            "INSERT INTO galleries (title, owner_id) \
             VALUES ($1, $2) \
             RETURNING {GALLERY_COLUMNS}"
        );
        sqlx::query_as::<_, Gallery>(&query)
            .bind(title.trim())
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a gallery by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gallery>, sqlx::Error> {
        let query = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE id = $1");
        sqlx::query_as::<_, Gallery>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a gallery by its exact title.
    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Gallery>, sqlx::Error> {
        let query = format!("SELECT {GALLERY_COLUMNS} FROM galleries WHERE title = $1");
        sqlx::query_as::<_, Gallery>(&query)
            .bind(title.trim())
            .fetch_optional(pool)
            .await
    }

    /// Count live media items of one kind in a gallery.
    pub async fn count_items(
        pool: &PgPool,
        gallery_id: DbId,
        kind: MediaKind,
    ) -> Result<i64, sqlx::Error> {
        let (member_table, member_fk) = kind.gallery_join();
        let entity_table = kind.entity_table();
        let query = format!(
            "SELECT COUNT(*) FROM {member_table} g \
             JOIN {entity_table} m ON m.id = g.{member_fk} AND m.deleted_at IS NULL \
             WHERE g.gallery_id = $1"
        );
        sqlx::query_scalar(&query)
            .bind(gallery_id)
            .fetch_one(pool)
            .await
    }

    /// List all galleries sorted by title.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Gallery>, sqlx::Error> {
        let query = format!("SELECT {GALLERY_COLUMNS} FROM galleries ORDER BY title");
        sqlx::query_as::<_, Gallery>(&query).fetch_all(pool).await
    }

    /// Add a media item to a gallery. Idempotent: does nothing if already a
    /// member.
    ///
    /// Touches the gallery's `updated_at` only when a new membership row is
    /// created.
    pub async fn add_item(
        pool: &PgPool,
        gallery_id: DbId,
        kind: MediaKind,
        media_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (member_table, member_fk) = kind.gallery_join();
        let query = format!(
            "INSERT INTO {member_table} (gallery_id, {member_fk}) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(gallery_id)
            .bind(media_id)
            .execute(pool)
            .await?;

        let was_added = result.rows_affected() > 0;
        if was_added {
            Self::touch(pool, gallery_id).await?;
        }
        Ok(was_added)
    }

    /// Remove a media item from a gallery.
    pub async fn remove_item(
        pool: &PgPool,
        gallery_id: DbId,
        kind: MediaKind,
        media_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (member_table, member_fk) = kind.gallery_join();
        let query = format!(
            "DELETE FROM {member_table} \
             WHERE gallery_id = $1 AND {member_fk} = $2"
        );
        let result = sqlx::query(&query)
            .bind(gallery_id)
            .bind(media_id)
            .execute(pool)
            .await?;

        let was_removed = result.rows_affected() > 0;
        if was_removed {
            Self::touch(pool, gallery_id).await?;
        }
        Ok(was_removed)
    }

    async fn touch(pool: &PgPool, gallery_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE galleries SET updated_at = NOW() WHERE id = $1")
            .bind(gallery_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
