//! Gallery routes.
//!
//! | Method | Path            | Handler          |
//! |--------|-----------------|------------------|
//! | GET    | `/`             | `list_galleries` |
//! | POST   | `/`             | `create_gallery` |
//! | GET    | `/{id}`         | `get_gallery`    |
//! | PUT    | `/{id}/items`   | `add_items`      |
//! | DELETE | `/{id}/items`   | `remove_items`   |
//! | GET    | `/{id}/browse`  | `browse_gallery` |

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::galleries as handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_galleries).post(handlers::create_gallery),
        )
        .route("/{id}", get(handlers::get_gallery))
        .route(
            "/{id}/items",
            put(handlers::add_items).delete(handlers::remove_items),
        )
        .route("/{id}/browse", get(handlers::browse_gallery))
}
