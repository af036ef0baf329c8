//! Media item routes.
//!
//! | Method | Path            | Handler        |
//! |--------|-----------------|----------------|
//! | GET    | `/{guid}`       | `get_media`    |
//! | DELETE | `/{guid}`       | `delete_media` |
//! | POST   | `/{guid}/tags`  | `tag_media`    |

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media as handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{guid}",
            get(handlers::get_media).delete(handlers::delete_media),
        )
        .route("/{guid}/tags", post(handlers::tag_media))
}
