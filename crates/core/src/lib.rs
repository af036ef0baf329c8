//! Vitrine core library.
//!
//! Dependency-light domain logic shared by the database and API layers:
//! shared id/timestamp types, domain errors, the media-kind lookup, the
//! tag-bucket filter model, feed ordering, and page-range parsing.
//!
//! Nothing in this crate touches the database or the network, so every
//! rule here is covered by plain unit tests.

pub mod error;
pub mod feed;
pub mod filter;
pub mod guid;
pub mod media;
pub mod types;
