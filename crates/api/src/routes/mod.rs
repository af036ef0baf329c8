//! Route definitions.
//!
//! Everything lives under `/api/v1` except the health probe, which the
//! router mounts at the root for load balancers.

pub mod auth;
pub mod galleries;
pub mod health;
pub mod media;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/galleries", galleries::router())
        .nest("/tags", tags::router())
        .nest("/media", media::router())
}
