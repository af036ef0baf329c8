//! Feed ordering and pagination.
//!
//! The gallery feed interleaves several media kinds into one stream ordered
//! by creation time, newest first, with the item id as tie-break (also
//! descending). Pages are addressed either by an explicit `start:end` range
//! or by the session cursor, in which case a page holds at most
//! [`DEFAULT_FEED_RANGE`] items per kind.

use std::cmp::Reverse;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Items fetched per kind when no explicit range is given.
pub const DEFAULT_FEED_RANGE: usize = 300;

/// Anything that can be ordered into the feed.
pub trait FeedItem {
    fn created_at(&self) -> Timestamp;
    fn id(&self) -> DbId;
}

/// Sort a merged feed in place: creation time descending, id descending on
/// ties. The sort is stable, so items with identical keys keep the order in
/// which their kinds were concatenated.
pub fn sort_feed<T: FeedItem>(items: &mut [T]) {
    items.sort_by_key(|item| Reverse((item.created_at(), item.id())));
}

// ---------------------------------------------------------------------------
// Page ranges
// ---------------------------------------------------------------------------

/// A half-open `[start, end)` slice of the merged feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    /// The range used when the request carries no `rng`.
    pub const DEFAULT: PageRange = PageRange {
        start: 0,
        end: DEFAULT_FEED_RANGE,
    };

    /// Parse a `start:end` pair of non-negative integers.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let malformed =
            || CoreError::Validation(format!("rng must be start:end, got {raw:?}"));
        let (start, end) = raw.split_once(':').ok_or_else(malformed)?;
        Ok(PageRange {
            start: start.trim().parse().map_err(|_| malformed())?,
            end: end.trim().parse().map_err(|_| malformed())?,
        })
    }

    /// Clamp to a feed of `len` items. An inverted range yields an empty
    /// slice at its start position rather than an error.
    pub fn clamp(&self, len: usize) -> (usize, usize) {
        let start = self.start.min(len);
        let end = self.end.min(len).max(start);
        (start, end)
    }
}

/// Reduce a merged feed to the requested page.
pub fn slice_page<T>(mut items: Vec<T>, range: PageRange) -> Vec<T> {
    let (start, end) = range.clamp(items.len());
    items.truncate(end);
    items.drain(..start);
    items
}
