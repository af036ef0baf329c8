//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod gallery_repo;
pub mod media_repo;
pub mod tag_repo;
pub mod user_repo;

pub use gallery_repo::GalleryRepo;
pub use media_repo::MediaRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
