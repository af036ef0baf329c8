//! Per-session browse cursor store.
//!
//! Each authenticated session tracks, per media kind, the id below which it
//! has already seen feed items. The store is in-process state: cursors
//! reset when the server restarts or the session logs out, which only costs
//! the client a fresh first page.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use vitrine_core::media::MediaKind;
use vitrine_core::types::DbId;

/// Cursor state for one session: the last seen id per media kind.
#[derive(Debug, Default)]
pub struct BrowseCursors {
    last_ids: HashMap<MediaKind, DbId>,
}

impl BrowseCursors {
    pub fn get(&self, kind: MediaKind) -> Option<DbId> {
        self.last_ids.get(&kind).copied()
    }

    pub fn set(&mut self, kind: MediaKind, id: DbId) {
        self.last_ids.insert(kind, id);
    }

    /// Stored cursor, or 0 when none was ever established.
    pub fn last_id(&self, kind: MediaKind) -> DbId {
        self.get(kind).unwrap_or(0)
    }
}

/// In-process store of per-session cursors, keyed by user id.
///
/// Each session's cursors sit behind their own async mutex so one browse
/// request can hold them across its whole read-modify-write without
/// blocking other sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<DbId, Arc<Mutex<BrowseCursors>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to a session's cursors, created empty on first use.
    pub async fn cursors(&self, user_id: DbId) -> Arc<Mutex<BrowseCursors>> {
        if let Some(existing) = self.sessions.read().await.get(&user_id) {
            return Arc::clone(existing);
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(user_id).or_default())
    }

    /// Drop all cursor state for a session.
    pub async fn clear(&self, user_id: DbId) {
        self.sessions.write().await.remove(&user_id);
    }
}
