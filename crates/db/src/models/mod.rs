//! Database models.
//!
//! Each module holds the row structs for one table family plus the DTOs
//! used to create or modify those rows.

pub mod gallery;
pub mod media;
pub mod tag;
pub mod user;
