use crate::errors::AlmacenResult;
use crate::store::memory::{InMemoryStore, InMemoryStoreConfig};
use crate::store::{DocumentStore, StoreModule};

/// Store module for the in-memory backend.
///
/// ```rust
/// use almacen::store::memory::InMemoryStoreModule;
/// use almacen::store::StoreModule;
///
/// let module = InMemoryStoreModule::with_config()
///     .initial_capacity(64)
///     .build();
/// let store = module.get_store().unwrap();
/// assert!(!store.is_closed().unwrap());
/// ```
#[derive(Default)]
pub struct InMemoryStoreModule {
    store_config: InMemoryStoreConfig,
}

impl InMemoryStoreModule {
    pub fn new() -> InMemoryStoreModule {
        InMemoryStoreModule {
            store_config: InMemoryStoreConfig::new(),
        }
    }

    pub fn with_config() -> InMemoryStoreModuleBuilder {
        InMemoryStoreModuleBuilder::new()
    }
}

impl StoreModule for InMemoryStoreModule {
    /// Every call returns a new, empty store.
    fn get_store(&self) -> AlmacenResult<DocumentStore> {
        let store = InMemoryStore::new(self.store_config.clone());
        Ok(DocumentStore::new(store))
    }
}

#[derive(Default)]
pub struct InMemoryStoreModuleBuilder {
    store_config: InMemoryStoreConfig,
}

impl InMemoryStoreModuleBuilder {
    pub fn new() -> InMemoryStoreModuleBuilder {
        InMemoryStoreModuleBuilder {
            store_config: InMemoryStoreConfig::new(),
        }
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.store_config.set_initial_capacity(capacity);
        self
    }

    pub fn build(self) -> InMemoryStoreModule {
        InMemoryStoreModule {
            store_config: self.store_config,
        }
    }
}
