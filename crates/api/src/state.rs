//! Shared application state.

use std::sync::Arc;

use vitrine_db::DbPool;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// State available to all request handlers. Cloned per request; everything
/// inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        AppState {
            pool,
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
