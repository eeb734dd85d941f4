//! Documents and the collections that group them.

#[allow(clippy::module_inception)]
mod collection;
mod document;

pub use collection::*;
pub use document::*;
