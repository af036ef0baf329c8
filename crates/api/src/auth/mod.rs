//! Authentication: JWT issuing and validation.

pub mod jwt;
