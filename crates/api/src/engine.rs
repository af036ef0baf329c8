//! Gallery feed engine: filtering, merge ordering and cursor pagination.
//!
//! A browse request names a gallery and up to four query parameters:
//!
//! * `models`  - comma-separated media kinds, default both.
//! * `filters` - JSON array of filter buckets. A bucket matches an item
//!   when any of its tokens match (tag id or title substring); an item
//!   must match every bucket.
//! * `rng`     - explicit `start:end` slice of the merged feed. Explicit
//!   ranges never touch the session cursors, so they can be replayed.
//! * `more`    - continue below the stored cursor instead of starting
//!   from the top of the feed.
//!
//! Per kind, the engine resolves an exclusive upper id bound: the stored
//! cursor for `more` requests that have one, otherwise one past the
//! highest id ever assigned for that kind. Fresh bounds are written back
//! to the session unless the range is explicit. Matching items of all
//! requested kinds are then merged newest-first (id descending on ties),
//! the page is sliced out, and for cursor-driven requests the cursors
//! advance to the last id of each kind present on the page.
//!
//! The whole read-modify-write runs while holding the session's cursor
//! mutex, so concurrent requests from one session serialize.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vitrine_core::error::CoreError;
use vitrine_core::feed::{self, FeedItem, PageRange, DEFAULT_FEED_RANGE};
use vitrine_core::filter::{parse_filters, FilterBucket};
use vitrine_core::media::{MediaKind, ALL_KINDS};
use vitrine_core::types::{DbId, Timestamp};
use vitrine_db::models::media::MediaItem;
use vitrine_db::models::tag::TagInfo;
use vitrine_db::repositories::MediaRepo;
use vitrine_db::DbPool;

use crate::error::AppError;
use crate::session::SessionStore;

/// Raw query parameters accepted by the browse endpoint. Kept as strings
/// so every validation failure produces the same error shape.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    pub models: Option<String>,
    pub filters: Option<String>,
    pub rng: Option<String>,
    pub more: Option<String>,
}

/// A fully parsed browse request. Produced before any session state is
/// touched, so malformed input never leaves a half-updated session.
#[derive(Debug)]
struct BrowseRequest {
    kinds: Vec<MediaKind>,
    buckets: Vec<FilterBucket>,
    range: PageRange,
    explicit_range: bool,
    more: bool,
}

/// One entry of a feed page: the item, its kind and its tags.
#[derive(Debug, Serialize)]
pub struct FeedEntry {
    pub kind: MediaKind,
    #[serde(flatten)]
    pub item: MediaItem,
    pub tags: Vec<TagInfo>,
}

impl FeedItem for FeedEntry {
    fn created_at(&self) -> Timestamp {
        self.item.created_at()
    }

    fn id(&self) -> DbId {
        self.item.id()
    }
}

/// Browse response envelope.
///
/// `last_image_id` / `last_video_id` report the session cursors as of the
/// end of the call, 0 when never established. Explicit-range calls report
/// the page's own last id for each kind present on the page instead.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub success: bool,
    /// Effective page range, `start:end`.
    pub message: String,
    pub count: usize,
    pub last_image_id: DbId,
    pub last_video_id: DbId,
    pub items: Vec<FeedEntry>,
}

/// Serve one browse request against a gallery.
pub async fn browse(
    pool: &DbPool,
    sessions: &SessionStore,
    user_id: DbId,
    gallery_id: DbId,
    params: &BrowseParams,
) -> Result<BrowseResponse, AppError> {
    let request = parse_request(params)?;

    let handle = sessions.cursors(user_id).await;
    let mut cursors = handle.lock().await;

    let mut entries: Vec<FeedEntry> = Vec::new();
    for &kind in &request.kinds {
        let below_id = match (request.more, cursors.get(kind)) {
            (true, Some(cursor)) => cursor,
            _ => {
                let fresh = MediaRepo::max_id(pool, kind).await? + 1;
                if !request.explicit_range {
                    cursors.set(kind, fresh);
                }
                fresh
            }
        };

        // Cursor-driven pages are capped per kind; explicit ranges slice
        // the full matching feed instead.
        let limit = if request.explicit_range {
            None
        } else {
            Some(DEFAULT_FEED_RANGE as i64)
        };
        let items =
            MediaRepo::fetch_feed(pool, gallery_id, kind, &request.buckets, below_id, limit)
                .await?;

        let ids: Vec<DbId> = items.iter().map(|item| item.id).collect();
        let mut tag_map = MediaRepo::tags_for_items(pool, kind, &ids).await?;
        entries.extend(items.into_iter().map(|item| {
            let tags = tag_map.remove(&item.id).unwrap_or_default();
            FeedEntry { kind, item, tags }
        }));
    }

    // A single kind is already in feed order straight from SQL.
    if request.kinds.len() > 1 {
        feed::sort_feed(&mut entries);
    }

    let page = feed::slice_page(entries, request.range);

    // Last id of each kind present on the page. The page is descending,
    // so the last occurrence is that kind's smallest id.
    let mut page_last: HashMap<MediaKind, DbId> = HashMap::new();
    for entry in &page {
        page_last.insert(entry.kind, entry.item.id());
    }

    if !request.explicit_range {
        for (&kind, &id) in &page_last {
            cursors.set(kind, id);
        }
    }

    let last_id = |kind: MediaKind| {
        if request.explicit_range {
            page_last
                .get(&kind)
                .copied()
                .unwrap_or_else(|| cursors.last_id(kind))
        } else {
            cursors.last_id(kind)
        }
    };
    let last_image_id = last_id(MediaKind::Image);
    let last_video_id = last_id(MediaKind::Video);

    let count = page.len();
    tracing::debug!(
        user_id,
        gallery_id,
        count,
        more = request.more,
        "Browse page served"
    );

    Ok(BrowseResponse {
        success: true,
        message: format!("{}:{}", request.range.start, request.range.end),
        count,
        last_image_id,
        last_video_id,
        items: page,
    })
}

fn parse_request(params: &BrowseParams) -> Result<BrowseRequest, CoreError> {
    let kinds = match params.models.as_deref() {
        Some(raw) => MediaKind::parse_list(raw)?,
        None => ALL_KINDS.to_vec(),
    };

    let buckets = match params.filters.as_deref() {
        Some(raw) => parse_filters(raw)?,
        None => Vec::new(),
    };

    let (range, explicit_range) = match params.rng.as_deref() {
        Some(raw) => (PageRange::parse(raw)?, true),
        None => (PageRange::DEFAULT, false),
    };

    Ok(BrowseRequest {
        kinds,
        buckets,
        range,
        explicit_range,
        more: parse_more(params.more.as_deref())?,
    })
}

fn parse_more(raw: Option<&str>) -> Result<bool, CoreError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "more must be a boolean, got {other:?}"
        ))),
    }
}
