//! # Typed Responses
//!
//! Purpose: One closed sum type per cache operation. Callers match on the
//! variants exhaustively, or call `into_result()` to move the `Error`
//! variant onto the `?` path.
//!
//! ## Design Principles
//! 1. **Immutable Values**: Responses are built once from a resolved reply
//!    and never mutated; all are `Clone + Send + Sync`.
//! 2. **Bounded Rendering**: `render()` and `Debug` never print a whole
//!    payload or a whole batch, so responses are safe to log.
//! 3. **Errors as Data**: The `Error` variant holds a classified `SdkError`.

mod dictionary;
mod item;
mod list;

pub use dictionary::{
    DictionaryGetFieldResponse, DictionaryGetFieldsHit, DictionaryGetFieldsResponse,
    DictionarySetFieldsResponse,
};
pub use item::{DeleteResponse, GetHit, GetResponse, SetResponse, SetSuccess};
pub use list::{ListConcatenateFrontResponse, ListRemoveValueResponse};

use rkv_common::text::{truncate_to, ERROR_PREVIEW_CHARS};
use rkv_common::SdkError;

/// Bounded, human-readable rendering for diagnostic logs.
pub trait Render {
    fn render(&self) -> String;
}

pub(crate) fn render_error(err: &SdkError) -> String {
    format!("Error: {}", truncate_to(&err.to_string(), ERROR_PREVIEW_CHARS))
}
