//! Shared response envelope types.

use serde::Serialize;

/// Standard success envelope: `{ "data": ... }`.
///
/// The browse endpoint does not use this; its envelope carries paging
/// state and is defined in [`crate::engine`].
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}
