//! Gallery models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vitrine_core::types::{DbId, Timestamp};

/// A row from the `galleries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gallery {
    pub id: DbId,
    pub title: String,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new gallery.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGallery {
    pub title: String,
}

/// DTO for adding or removing gallery members by guid.
#[derive(Debug, Clone, Deserialize)]
pub struct ModifyGalleryItems {
    pub guids: Vec<String>,
}
