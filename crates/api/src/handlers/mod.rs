//! Request handlers, grouped by resource.

pub mod auth;
pub mod galleries;
pub mod media;
pub mod tags;
