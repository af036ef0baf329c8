//! Media content kinds and their per-kind SQL identifiers.
//!
//! The feed engine works across two separately stored content types. All
//! per-kind dispatch goes through [`MediaKind`] and its lookup methods, so
//! the database layer can build queries for either kind without stringly
//! typed table names leaking anywhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A content type that can appear in a gallery feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Every kind, in the order feeds default to when the caller names none.
pub const ALL_KINDS: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

impl MediaKind {
    /// Lowercase wire name (`"image"` / `"video"`), as used in the
    /// `models` query parameter and serialized feed items.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Parse a single wire name. Unknown names are a validation error.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        match name {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(CoreError::Validation(format!(
                "Unknown content type '{other}'. Must be one of: image, video"
            ))),
        }
    }

    /// Parse a comma-separated kind list (the `models` query parameter).
    ///
    /// Names are trimmed and deduplicated preserving first occurrence.
    /// An unknown name or an effectively empty list is a validation error.
    pub fn parse_list(csv: &str) -> Result<Vec<Self>, CoreError> {
        let mut kinds = Vec::new();
        for name in csv.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let kind = Self::parse(name)?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return Err(CoreError::Validation(
                "models must name at least one content type".into(),
            ));
        }
        Ok(kinds)
    }

    /// Capitalized entity name for error messages (`"Image"` / `"Video"`).
    pub fn entity_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
        }
    }

    // -----------------------------------------------------------------------
    // SQL identifier lookup
    // -----------------------------------------------------------------------

    /// Entity table holding rows of this kind.
    pub fn entity_table(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Gallery membership join table and its media-side FK column.
    pub fn gallery_join(&self) -> (&'static str, &'static str) {
        match self {
            MediaKind::Image => ("gallery_images", "image_id"),
            MediaKind::Video => ("gallery_videos", "video_id"),
        }
    }

    /// Tag association join table and its media-side FK column.
    pub fn tag_join(&self) -> (&'static str, &'static str) {
        match self {
            MediaKind::Image => ("image_tags", "image_id"),
            MediaKind::Video => ("video_tags", "video_id"),
        }
    }

    /// Single-character GUID prefix identifying this kind.
    pub fn guid_prefix(&self) -> char {
        match self {
            MediaKind::Image => 'i',
            MediaKind::Video => 'v',
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
