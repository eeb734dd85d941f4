use crate::collection::Document;
use crate::common::Value;
use crate::context::Context;
use crate::errors::AlmacenResult;
use std::ops::Deref;
use std::sync::Arc;

/// The contract every storage backend implements.
///
/// # Operations
///
/// Collections are created implicitly on first write. Reading an unknown
/// collection behaves as reading an empty one.
///
/// - `find_all` returns every document of a collection, in unspecified order.
/// - `find_by_id` returns one document, or `NotFound`.
/// - `save` stores a document under its own `_id`, replacing any previous
///   document in full. Fails with `IdNotString` if `_id` is missing or not a
///   string.
/// - `delete` removes a document. Deleting an unknown id succeeds.
/// - `find_field` returns the value at a dot-separated path, or `NotFound`.
/// - `update_field` sets the value at a path. Fails with `TraversingObject`
///   if the document or any intermediate document is missing.
/// - `delete_field` removes the value at a path. Never fails for a path that
///   cannot be resolved; the call is then a no-op.
///
/// Every document or value returned is an independent copy: mutating it
/// never affects the store, and later writes never affect it.
///
/// A failed call leaves the store exactly as it was.
///
/// # Lifecycle
///
/// `open_or_create` must be called before use. After `close` every
/// operation fails with `StoreAlreadyClosed`.
///
/// # Thread Safety
///
/// Implementers must be `Send + Sync`; one instance serves all callers.
pub trait DocumentStoreProvider: Send + Sync {
    /// Opens the store, creating its storage if needed.
    fn open_or_create(&self) -> AlmacenResult<()>;

    fn is_closed(&self) -> AlmacenResult<bool>;

    /// Makes all completed writes durable. No-op for volatile stores.
    fn commit(&self) -> AlmacenResult<()>;

    /// Commits and closes the store. Closing twice is not an error.
    fn close(&self) -> AlmacenResult<()>;

    /// Returns a backend name and version, e.g. `InMemory/0.1.0`.
    fn store_version(&self) -> AlmacenResult<String>;

    fn find_all(&self, ctx: &Context, collection: &str) -> AlmacenResult<Vec<Document>>;

    fn find_by_id(&self, ctx: &Context, collection: &str, id: &str) -> AlmacenResult<Document>;

    fn save(&self, ctx: &Context, collection: &str, document: Document) -> AlmacenResult<()>;

    fn delete(&self, ctx: &Context, collection: &str, id: &str) -> AlmacenResult<()>;

    fn find_field(&self, ctx: &Context, collection: &str, id: &str, path: &str) -> AlmacenResult<Value>;

    fn update_field(
        &self,
        ctx: &Context,
        collection: &str,
        id: &str,
        path: &str,
        value: Value,
    ) -> AlmacenResult<()>;

    fn delete_field(&self, ctx: &Context, collection: &str, id: &str, path: &str) -> AlmacenResult<()>;
}

/// Shared handle to a [DocumentStoreProvider].
///
/// Built once at start-up and cloned into every caller; cloning only bumps
/// a reference count. Dereferences to the provider, so contract operations
/// are called directly on the handle.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn DocumentStoreProvider>,
}

impl DocumentStore {
    pub fn new<T: DocumentStoreProvider + 'static>(inner: T) -> Self {
        DocumentStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for DocumentStore {
    type Target = Arc<dyn DocumentStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
