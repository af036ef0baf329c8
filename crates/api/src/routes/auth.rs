//! Auth routes.
//!
//! | Method | Path      | Handler  |
//! |--------|-----------|----------|
//! | POST   | `/login`  | `login`  |
//! | POST   | `/logout` | `logout` |

use axum::routing::post;
use axum::Router;

use crate::handlers::auth as handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}
