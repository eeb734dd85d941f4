//! Common types shared by every part of the store.
//!
//! - [`Value`] - the value model stored inside documents
//! - [`FieldPath`] - a parsed dot-separated field path
//! - constants such as [`DOC_ID`] and [`FIELD_SEPARATOR`]

mod constants;
mod field_path;
mod value;

pub use constants::*;
pub use field_path::*;
pub use value::*;
