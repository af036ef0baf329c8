//! Vitrine HTTP API.
//!
//! Library crate so integration tests can build the full router with the
//! same middleware stack the binary serves.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
