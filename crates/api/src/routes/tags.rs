//! Tag routes.
//!
//! | Method | Path      | Handler       |
//! |--------|-----------|---------------|
//! | GET    | `/`       | `list_tags`   |
//! | POST   | `/`       | `create_tag`  |
//! | GET    | `/search` | `search_tags` |
//! | POST   | `/manage` | `manage_tags` |

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tags as handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tags).post(handlers::create_tag))
        .route("/search", get(handlers::search_tags))
        .route("/manage", post(handlers::manage_tags))
}
