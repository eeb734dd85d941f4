use crate::collection::{Collection, Document};
use crate::common::{FieldPath, Value, ALMACEN_VERSION};
use crate::context::Context;
use crate::errors::{AlmacenError, AlmacenResult, ErrorKind};
use crate::store::memory::InMemoryStoreConfig;
use crate::store::traversal;
use crate::store::DocumentStoreProvider;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory implementation of the store contract.
///
/// All collections live in one map behind a single readers-writer lock:
/// `find_all`, `find_by_id` and `find_field` share it, every mutating
/// operation holds it exclusively. A reader therefore never observes a
/// half-applied write.
///
/// Documents are handed out as clones. [Document] clones are persistent
/// copies, so this costs O(1) per document and the caller gets a value it
/// may freely mutate.
///
/// Nothing survives [`DocumentStoreProvider::close`] or the process.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    pub fn new(store_config: InMemoryStoreConfig) -> InMemoryStore {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner::new(store_config)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        InMemoryStore::new(InMemoryStoreConfig::new())
    }
}

impl DocumentStoreProvider for InMemoryStore {
    fn open_or_create(&self) -> AlmacenResult<()> {
        self.inner.open_or_create()
    }

    fn is_closed(&self) -> AlmacenResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn commit(&self) -> AlmacenResult<()> {
        self.inner.check_opened()
    }

    fn close(&self) -> AlmacenResult<()> {
        self.inner.close()
    }

    fn store_version(&self) -> AlmacenResult<String> {
        Ok(format!("InMemory/{}", ALMACEN_VERSION))
    }

    fn find_all(&self, ctx: &Context, collection: &str) -> AlmacenResult<Vec<Document>> {
        ctx.debug(format_args!("find all in {}", collection));
        self.inner.find_all(collection)
    }

    fn find_by_id(&self, ctx: &Context, collection: &str, id: &str) -> AlmacenResult<Document> {
        ctx.debug(format_args!("find {} in {}", id, collection));
        self.inner.find_by_id(collection, id)
    }

    fn save(&self, ctx: &Context, collection: &str, document: Document) -> AlmacenResult<()> {
        ctx.debug(format_args!("save {:?} in {}", document, collection));
        self.inner.save(collection, document)
    }

    fn delete(&self, ctx: &Context, collection: &str, id: &str) -> AlmacenResult<()> {
        ctx.debug(format_args!("delete {} in {}", id, collection));
        self.inner.delete(collection, id)
    }

    fn find_field(&self, ctx: &Context, collection: &str, id: &str, path: &str) -> AlmacenResult<Value> {
        ctx.debug(format_args!("find field {} of {} in {}", path, id, collection));
        self.inner.find_field(collection, id, &FieldPath::new(path))
    }

    fn update_field(
        &self,
        ctx: &Context,
        collection: &str,
        id: &str,
        path: &str,
        value: Value,
    ) -> AlmacenResult<()> {
        ctx.debug(format_args!(
            "update field {} of {} in {} to {:?}",
            path, id, collection, value
        ));
        self.inner.update_field(collection, id, &FieldPath::new(path), value)
    }

    fn delete_field(&self, ctx: &Context, collection: &str, id: &str, path: &str) -> AlmacenResult<()> {
        ctx.debug(format_args!("delete field {} of {} in {}", path, id, collection));
        self.inner.delete_field(collection, id, &FieldPath::new(path))
    }
}

struct InMemoryStoreInner {
    closed: AtomicBool,
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryStoreInner {
    fn new(store_config: InMemoryStoreConfig) -> InMemoryStoreInner {
        InMemoryStoreInner {
            closed: AtomicBool::from(false),
            collections: RwLock::new(HashMap::with_capacity(store_config.initial_capacity())),
        }
    }

    fn check_opened(&self) -> AlmacenResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("In-memory store is already closed");
            return Err(AlmacenError::new(
                "In-memory store is already closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }

    fn open_or_create(&self) -> AlmacenResult<()> {
        self.check_opened()?;
        log::debug!("In-memory store opened");
        Ok(())
    }

    fn close(&self) -> AlmacenResult<()> {
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        self.collections.write().clear();
        log::debug!("In-memory store closed");
        Ok(())
    }

    fn find_all(&self, collection: &str) -> AlmacenResult<Vec<Document>> {
        self.check_opened()?;
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|c| c.documents().cloned().collect())
            .unwrap_or_default())
    }

    fn find_by_id(&self, collection: &str, id: &str) -> AlmacenResult<Document> {
        self.check_opened()?;
        let collections = self.collections.read();
        collections
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
            .ok_or_else(|| AlmacenError::from(ErrorKind::NotFound))
    }

    fn save(&self, collection: &str, document: Document) -> AlmacenResult<()> {
        self.check_opened()?;
        // reject before the collection is created
        document.id()?;

        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(document)?;
        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> AlmacenResult<()> {
        self.check_opened()?;
        let mut collections = self.collections.write();
        if let Some(c) = collections.get_mut(collection) {
            c.remove(id);
        }
        Ok(())
    }

    fn find_field(&self, collection: &str, id: &str, path: &FieldPath) -> AlmacenResult<Value> {
        self.check_opened()?;
        let collections = self.collections.read();
        let root = collections.get(collection).and_then(|c| c.get(id));
        traversal::find_field(root, path)
    }

    fn update_field(
        &self,
        collection: &str,
        id: &str,
        path: &FieldPath,
        value: Value,
    ) -> AlmacenResult<()> {
        self.check_opened()?;
        let mut collections = self.collections.write();
        let root = collections.get_mut(collection).and_then(|c| c.get_mut(id));
        traversal::update_field(root, path, value)
    }

    fn delete_field(&self, collection: &str, id: &str, path: &FieldPath) -> AlmacenResult<()> {
        self.check_opened()?;
        let mut collections = self.collections.write();
        let root = collections.get_mut(collection).and_then(|c| c.get_mut(id));
        traversal::delete_field(root, path);
        Ok(())
    }
}
