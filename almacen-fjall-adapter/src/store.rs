use crate::config::FjallConfig;
use crate::wrapper::{collection_prefix, decode_document, document_key, to_almacen_error, FjallValue};
use almacen::collection::Document;
use almacen::common::{FieldPath, Value};
use almacen::context::Context;
use almacen::errors::{AlmacenError, AlmacenResult, ErrorKind};
use almacen::store::traversal;
use almacen::store::DocumentStoreProvider;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

const DOCUMENTS_PARTITION: &str = "documents";

/// Durable implementation of the store contract on the Fjall LSM engine.
///
/// Every collection shares one partition. A document lives under the key
/// `len(collection) ++ collection ++ id` (see [`collection_prefix`]), so a
/// collection is a key range and `find_all` a prefix scan. Values are
/// bincode-encoded [Document]s.
///
/// Reads share a readers-writer guard and writes take it exclusively, which
/// makes the read-modify-write of the field operations atomic with respect
/// to every other call on the same store.
///
/// Cloning is cheap; clones share the same keyspace.
#[derive(Clone)]
pub struct FjallStore {
    inner: Arc<FjallStoreInner>,
}

impl FjallStore {
    /// Creates a store over `config`. Nothing touches the disk before
    /// [`DocumentStoreProvider::open_or_create`].
    #[inline]
    pub fn new(config: FjallConfig) -> FjallStore {
        FjallStore {
            inner: Arc::new(FjallStoreInner::new(config)),
        }
    }
}

impl DocumentStoreProvider for FjallStore {
    fn open_or_create(&self) -> AlmacenResult<()> {
        self.inner.open_or_create()
    }

    fn is_closed(&self) -> AlmacenResult<bool> {
        Ok(self.inner.closed.load(Ordering::Relaxed))
    }

    fn commit(&self) -> AlmacenResult<()> {
        self.inner.check_opened()?;
        self.inner.commit()
    }

    fn close(&self) -> AlmacenResult<()> {
        self.inner.close()
    }

    fn store_version(&self) -> AlmacenResult<String> {
        Ok(format!("Fjall/{}", env!("CARGO_PKG_VERSION")))
    }

    fn find_all(&self, ctx: &Context, collection: &str) -> AlmacenResult<Vec<Document>> {
        ctx.debug(format_args!("find all in {}", collection));
        self.inner.find_all(collection)
    }

    fn find_by_id(&self, ctx: &Context, collection: &str, id: &str) -> AlmacenResult<Document> {
        ctx.debug(format_args!("find {} in {}", id, collection));
        let _guard = self.inner.guard.read();
        self.inner
            .load(collection, id)?
            .ok_or_else(|| AlmacenError::from(ErrorKind::NotFound))
    }

    fn save(&self, ctx: &Context, collection: &str, document: Document) -> AlmacenResult<()> {
        ctx.debug(format_args!("save {:?} in {}", document, collection));
        let _guard = self.inner.guard.write();
        self.inner.store(collection, &document)
    }

    fn delete(&self, ctx: &Context, collection: &str, id: &str) -> AlmacenResult<()> {
        ctx.debug(format_args!("delete {} in {}", id, collection));
        let _guard = self.inner.guard.write();
        self.inner.remove(collection, id)
    }

    fn find_field(&self, ctx: &Context, collection: &str, id: &str, path: &str) -> AlmacenResult<Value> {
        ctx.debug(format_args!("find field {} of {} in {}", path, id, collection));
        let _guard = self.inner.guard.read();
        let document = self.inner.load(collection, id)?;
        traversal::find_field(document.as_ref(), &FieldPath::new(path))
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
        let _guard = self.inner.guard.write();
        let mut document = self.inner.load(collection, id)?;
        traversal::update_field(document.as_mut(), &FieldPath::new(path), value)?;
        match document {
            Some(document) => self.inner.store(collection, &document),
            None => Ok(()),
        }
    }

    fn delete_field(&self, ctx: &Context, collection: &str, id: &str, path: &str) -> AlmacenResult<()> {
        ctx.debug(format_args!("delete field {} of {} in {}", path, id, collection));
        let _guard = self.inner.guard.write();
        let mut document = self.inner.load(collection, id)?;
        if !traversal::delete_field(document.as_mut(), &FieldPath::new(path)) {
            return Ok(());
        }
        match document {
            Some(document) => self.inner.store(collection, &document),
            None => Ok(()),
        }
    }
}

struct FjallStoreInner {
    keyspace: OnceLock<Keyspace>,
    partition: OnceLock<PartitionHandle>,
    closed: AtomicBool,
    store_config: FjallConfig,
    guard: RwLock<()>,
}

impl FjallStoreInner {
    fn new(store_config: FjallConfig) -> FjallStoreInner {
        FjallStoreInner {
            keyspace: OnceLock::new(),
            partition: OnceLock::new(),
            closed: AtomicBool::from(false),
            store_config,
            guard: RwLock::new(()),
        }
    }

    fn check_opened(&self) -> AlmacenResult<()> {
        if self.closed.load(Ordering::Relaxed) {
            log::error!("Fjall store is already closed");
            return Err(AlmacenError::new(
                "Fjall store is already closed",
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }

    fn partition(&self) -> AlmacenResult<&PartitionHandle> {
        self.check_opened()?;
        self.partition.get().ok_or_else(|| {
            log::error!("Fjall store is not opened");
            AlmacenError::new("Fjall store is not opened", ErrorKind::InternalError)
        })
    }

    fn open_or_create(&self) -> AlmacenResult<()> {
        self.check_opened()?;
        let _guard = self.guard.write();
        if self.partition.get().is_some() {
            return Ok(());
        }

        let keyspace = match self.keyspace.get() {
            Some(keyspace) => keyspace,
            None => match Keyspace::open(self.store_config.keyspace_config()) {
                Ok(keyspace) => self.keyspace.get_or_init(|| keyspace),
                Err(err) => {
                    log::error!("Failed to open or create keyspace: {}", err);
                    return Err(to_almacen_error(err));
                }
            },
        };

        match keyspace.open_partition(DOCUMENTS_PARTITION, self.store_config.partition_config()) {
            Ok(partition) => {
                self.partition.get_or_init(|| partition);
                log::debug!("Fjall store opened at {}", self.store_config.db_path());
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to open partition {}: {}", DOCUMENTS_PARTITION, err);
                Err(to_almacen_error(err))
            }
        }
    }

    fn commit(&self) -> AlmacenResult<()> {
        if let Some(ks) = self.keyspace.get() {
            match ks.persist(PersistMode::SyncAll) {
                Ok(_) => Ok(()),
                Err(err) => {
                    log::error!("Failed to commit keyspace: {}", err);
                    Err(to_almacen_error(err))
                }
            }
        } else {
            Ok(())
        }
    }

    fn close(&self) -> AlmacenResult<()> {
        let _guard = self.guard.write();
        if self.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        if self.store_config.commit_before_close() {
            self.commit()?;
        }
        log::debug!("Fjall store closed");
        Ok(())
    }

    fn load(&self, collection: &str, id: &str) -> AlmacenResult<Option<Document>> {
        let partition = self.partition()?;
        match partition.get(document_key(collection, id)) {
            Ok(Some(bytes)) => Ok(Some(decode_document(&bytes)?)),
            Ok(None) => Ok(None),
            Err(err) => {
                log::error!("Failed to read {} from {}: {}", id, collection, err);
                Err(to_almacen_error(err))
            }
        }
    }

    fn store(&self, collection: &str, document: &Document) -> AlmacenResult<()> {
        let partition = self.partition()?;
        let key = document_key(collection, document.id()?);
        let value = FjallValue::try_from_document(document)?;
        partition.insert(key, Vec::<u8>::from(value)).map_err(|err| {
            log::error!("Failed to write to {}: {}", collection, err);
            to_almacen_error(err)
        })
    }

    fn remove(&self, collection: &str, id: &str) -> AlmacenResult<()> {
        let partition = self.partition()?;
        partition.remove(document_key(collection, id)).map_err(|err| {
            log::error!("Failed to remove {} from {}: {}", id, collection, err);
            to_almacen_error(err)
        })
    }

    fn find_all(&self, collection: &str) -> AlmacenResult<Vec<Document>> {
        let _guard = self.guard.read();
        let partition = self.partition()?;
        let mut documents = Vec::new();
        for entry in partition.prefix(collection_prefix(collection)) {
            match entry {
                Ok((_, bytes)) => documents.push(decode_document(&bytes)?),
                Err(err) => {
                    log::error!("Failed to scan {}: {}", collection, err);
                    return Err(to_almacen_error(err));
                }
            }
        }
        Ok(documents)
    }
}

impl Drop for FjallStoreInner {
    fn drop(&mut self) {
        if self.closed.load(Ordering::Relaxed) || !self.store_config.commit_before_close() {
            return;
        }
        match self.commit() {
            Ok(_) => log::debug!("Committed keyspace during drop"),
            Err(e) => log::error!("Failed to commit keyspace: {}", e),
        }
    }
}
