//! Store factory functions for benchmarks

use crate::config::StoreType;
use almacen::store::memory::InMemoryStoreModule;
use almacen::store::{DocumentStore, StoreModule};
use almacen_fjall_adapter::FjallModule;
use tempfile::TempDir;

/// Result type for store operations
pub type StoreResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Context holding a store and, for durable stores, its directory
pub struct BenchContext {
    store: DocumentStore,
    _dir: Option<TempDir>,
}

impl BenchContext {
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}

impl Drop for BenchContext {
    fn drop(&mut self) {
        // close before the directory is removed
        let _ = self.store.close();
    }
}

/// Create an opened in-memory store
pub fn create_inmemory_store() -> StoreResult<BenchContext> {
    let store = InMemoryStoreModule::with_config().build().get_store()?;
    store.open_or_create()?;
    Ok(BenchContext { store, _dir: None })
}

/// Create an opened Fjall store in a fresh temporary directory
pub fn create_fjall_store() -> StoreResult<BenchContext> {
    let dir = tempfile::Builder::new().prefix("almacen-bench-").tempdir()?;
    let path = dir.path().to_str().ok_or("temporary path is not valid UTF-8")?;

    let store = FjallModule::with_config()
        .db_path(path)
        .production_preset()
        .build()
        .get_store()?;
    store.open_or_create()?;

    Ok(BenchContext {
        store,
        _dir: Some(dir),
    })
}

/// Create an opened store of the given type
pub fn create_store(store_type: StoreType) -> StoreResult<BenchContext> {
    match store_type {
        StoreType::InMemory => create_inmemory_store(),
        StoreType::Fjall => create_fjall_store(),
    }
}
