use crate::config::FjallConfig;
use crate::store::FjallStore;
use almacen::errors::{AlmacenError, AlmacenResult, ErrorKind};
use almacen::store::{DocumentStore, StoreModule};
use fjall::CompressionType;

/// Store module for the durable Fjall backend.
///
/// # Examples
///
/// ```rust,no_run
/// use almacen::store::StoreModule;
/// use almacen_fjall_adapter::FjallModule;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FjallModule::with_config()
///     .db_path("/var/lib/almacen")
///     .production_preset()
///     .build()
///     .get_store()?;
/// store.open_or_create()?;
/// # Ok(())
/// # }
/// ```
///
/// # Configuration Presets
///
/// - `production_preset()` - balanced configuration with periodic fsync
/// - `high_throughput_preset()` - large buffers, journal persisted on `commit` only
/// - `low_memory_preset()` - small caches and a single worker of each kind
pub struct FjallModule {
    store_config: FjallConfig,
}

impl FjallModule {
    #[inline]
    pub fn with_config() -> FjallModuleBuilder {
        FjallModuleBuilder::new()
    }
}

impl StoreModule for FjallModule {
    /// Fails with [`ErrorKind::ConfigError`] if no database path was set.
    fn get_store(&self) -> AlmacenResult<DocumentStore> {
        if self.store_config.db_path().is_empty() {
            log::error!("Fjall store requested without a database path");
            return Err(AlmacenError::new(
                "Fjall database path is not set",
                ErrorKind::ConfigError,
            ));
        }
        let store = FjallStore::new(self.store_config.clone());
        Ok(DocumentStore::new(store))
    }
}

/// Builder for [FjallModule].
pub struct FjallModuleBuilder {
    store_config: FjallConfig,
}

impl FjallModuleBuilder {
    #[inline]
    pub fn new() -> FjallModuleBuilder {
        FjallModuleBuilder {
            store_config: FjallConfig::new(),
        }
    }

    /// Balanced configuration for production use:
    /// - 256 MB block cache, 64 MB blob cache
    /// - 128 MB write buffer, 32 MB memtable
    /// - All CPU cores flush, half of them compact
    /// - Bloom filter with 10 bits per key
    /// - 100 ms fsync interval
    /// - LZ4 compression
    #[inline]
    pub fn production_preset(self) -> Self {
        let cpus = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(4);

        self.block_cache_capacity(256 * 1024 * 1024)
            .blob_cache_capacity(64 * 1024 * 1024)
            .max_write_buffer_size(128 * 1024 * 1024)
            .max_memtable_size(32 * 1024 * 1024)
            .flush_workers(cpus)
            .compaction_workers((cpus / 2).max(1))
            .bloom_filter_bits(10)
            .fsync_frequency(100)
            .compression_type(CompressionType::Lz4)
    }

    /// Large buffers and deferred durability: the journal is only persisted
    /// on `commit` and `close`. Suited to bulk imports.
    #[inline]
    pub fn high_throughput_preset(self) -> Self {
        let cpus = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(4);

        self.block_cache_capacity(512 * 1024 * 1024)
            .blob_cache_capacity(128 * 1024 * 1024)
            .max_write_buffer_size(256 * 1024 * 1024)
            .max_memtable_size(64 * 1024 * 1024)
            .flush_workers(cpus)
            .compaction_workers(cpus)
            .manual_journal_persist(true)
            .kv_separated(true)
            .bloom_filter_bits(0)
    }

    /// Minimal memory use at some cost in throughput.
    #[inline]
    pub fn low_memory_preset(self) -> Self {
        self.block_cache_capacity(16 * 1024 * 1024)
            .blob_cache_capacity(8 * 1024 * 1024)
            .max_write_buffer_size(32 * 1024 * 1024)
            .max_memtable_size(8 * 1024 * 1024)
            .flush_workers(1)
            .compaction_workers(1)
            .bloom_filter_bits(10)
    }

    #[inline]
    pub fn db_path(self, db_path: &str) -> Self {
        self.store_config.set_db_path(db_path);
        self
    }

    #[inline]
    pub fn manual_journal_persist(self, manual_journal_persist: bool) -> Self {
        self.store_config.set_manual_journal_persist(manual_journal_persist);
        self
    }

    #[inline]
    pub fn flush_workers(self, flush_workers_count: usize) -> Self {
        self.store_config.set_flush_workers(flush_workers_count);
        self
    }

    #[inline]
    pub fn compaction_workers(self, compaction_workers_count: usize) -> Self {
        self.store_config.set_compaction_workers(compaction_workers_count);
        self
    }

    #[inline]
    pub fn block_cache_capacity(self, block_cache_capacity: u64) -> Self {
        self.store_config.set_block_cache_capacity(block_cache_capacity);
        self
    }

    #[inline]
    pub fn blob_cache_capacity(self, blob_cache_capacity: u64) -> Self {
        self.store_config.set_blob_cache_capacity(blob_cache_capacity);
        self
    }

    #[inline]
    pub fn max_journaling_size(self, max_journaling_size: u64) -> Self {
        self.store_config.set_max_journaling_size(max_journaling_size);
        self
    }

    #[inline]
    pub fn max_write_buffer_size(self, max_write_buffer_size: u64) -> Self {
        self.store_config.set_max_write_buffer_size(max_write_buffer_size);
        self
    }

    #[inline]
    pub fn fsync_frequency(self, fsync_frequency: u16) -> Self {
        self.store_config.set_fsync_frequency(fsync_frequency);
        self
    }

    #[inline]
    pub fn commit_before_close(self, commit_before_close: bool) -> Self {
        self.store_config.set_commit_before_close(commit_before_close);
        self
    }

    #[inline]
    pub fn bloom_filter_bits(self, bloom_filter_bits: u8) -> Self {
        self.store_config.set_bloom_filter_bits(bloom_filter_bits as i8);
        self
    }

    #[inline]
    pub fn compression_type(self, compression_type: CompressionType) -> Self {
        self.store_config.set_compression_type(compression_type);
        self
    }

    #[inline]
    pub fn max_memtable_size(self, max_memtable_size: u32) -> Self {
        self.store_config.set_max_memtable_size(max_memtable_size);
        self
    }

    #[inline]
    pub fn block_size(self, block_size: u32) -> Self {
        self.store_config.set_block_size(block_size);
        self
    }

    #[inline]
    pub fn kv_separated(self, kv_separated: bool) -> Self {
        self.store_config.set_kv_separated(kv_separated);
        self
    }

    #[inline]
    pub fn build(self) -> FjallModule {
        FjallModule {
            store_config: self.store_config,
        }
    }
}

impl Default for FjallModuleBuilder {
    fn default() -> Self {
        FjallModuleBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fjall_module_with_config() {
        let builder = FjallModule::with_config();
        assert!(builder.store_config.db_path().is_empty());
    }

    #[test]
    fn test_fjall_module_get_store() {
        let module = FjallModule::with_config().db_path("module-test-path").build();
        let store = module.get_store().unwrap();
        assert!(!store.is_closed().unwrap());
        assert!(store.store_version().unwrap().starts_with("Fjall/"));
    }

    #[test]
    fn test_fjall_module_get_store_without_path() {
        let module = FjallModule::with_config().build();
        let err = module.get_store().err().map(|e| e.kind().clone());
        assert_eq!(err, Some(ErrorKind::ConfigError));
    }

    #[test]
    fn test_fjall_module_builder() {
        let module = FjallModuleBuilder::new()
            .db_path("test_path")
            .manual_journal_persist(true)
            .flush_workers(4)
            .compaction_workers(2)
            .block_cache_capacity(1024)
            .blob_cache_capacity(2048)
            .max_journaling_size(4096)
            .max_write_buffer_size(8192)
            .fsync_frequency(10)
            .commit_before_close(false)
            .bloom_filter_bits(8)
            .compression_type(CompressionType::None)
            .max_memtable_size(1024)
            .block_size(4096)
            .kv_separated(true)
            .build();

        let config = &module.store_config;
        assert_eq!(config.db_path(), "test_path");
        assert!(config.manual_journal_persist());
        assert_eq!(config.flush_workers(), 4);
        assert_eq!(config.compaction_workers(), 2);
        assert_eq!(config.block_cache_capacity(), 1024);
        assert_eq!(config.blob_cache_capacity(), 2048);
        assert_eq!(config.max_journaling_size(), 4096);
        assert_eq!(config.max_write_buffer_size(), 8192);
        assert_eq!(config.fsync_frequency(), 10);
        assert!(!config.commit_before_close());
        assert_eq!(config.bloom_filter_bits(), 8);
        assert_eq!(config.compression_type(), CompressionType::None);
        assert_eq!(config.max_memtable_size(), 1024);
        assert_eq!(config.block_size(), 4096);
        assert!(config.kv_separated());
    }

    #[test]
    fn test_production_preset() {
        let module = FjallModule::with_config().production_preset().build();
        let config = &module.store_config;
        assert_eq!(config.block_cache_capacity(), 256 * 1024 * 1024);
        assert_eq!(config.fsync_frequency(), 100);
        assert_eq!(config.compression_type(), CompressionType::Lz4);
        assert!(config.compaction_workers() >= 1);
    }

    #[test]
    fn test_high_throughput_preset() {
        let module = FjallModule::with_config().high_throughput_preset().build();
        let config = &module.store_config;
        assert!(config.manual_journal_persist());
        assert!(config.kv_separated());
        assert_eq!(config.bloom_filter_bits(), 0);
    }

    #[test]
    fn test_low_memory_preset() {
        let module = FjallModule::with_config().low_memory_preset().build();
        let config = &module.store_config;
        assert_eq!(config.block_cache_capacity(), 16 * 1024 * 1024);
        assert_eq!(config.flush_workers(), 1);
        assert_eq!(config.compaction_workers(), 1);
    }

    #[test]
    fn test_preset_then_override() {
        let module = FjallModule::with_config()
            .low_memory_preset()
            .flush_workers(3)
            .build();
        assert_eq!(module.store_config.flush_workers(), 3);
    }
}
