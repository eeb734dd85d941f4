use crate::errors::AlmacenResult;
use crate::store::DocumentStore;

/// Builds the [DocumentStore] of one backend.
///
/// A process picks exactly one module at start-up and keeps the store it
/// returns for its whole lifetime.
pub trait StoreModule {
    fn get_store(&self) -> AlmacenResult<DocumentStore>;
}
