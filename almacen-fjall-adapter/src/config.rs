use fjall::{CompressionType, Config, KvSeparationOptions, PartitionCreateOptions};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicI8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// Fjall database configuration.
///
/// A cloneable, thread-safe holder for the Fjall tuning parameters. Clones
/// share the same settings through `Arc<FjallConfigInner>`.
///
/// Created with defaults by [`FjallConfig::new`] and adjusted through
/// [`crate::FjallModuleBuilder`].
#[derive(Clone)]
pub struct FjallConfig {
    inner: Arc<FjallConfigInner>,
}

impl FjallConfig {
    /// Creates a configuration with default values:
    /// - Block cache: 64 MB
    /// - Blob cache: 32 MB
    /// - Write buffer: 128 MB
    /// - Max journaling size: 512 MB
    /// - Bloom filter: 10 bits per key
    /// - Compression: LZ4
    /// - Flush workers: number of available CPU cores
    /// - Compaction workers: half of available CPU cores
    #[inline]
    pub fn new() -> FjallConfig {
        FjallConfig {
            inner: Arc::new(FjallConfigInner::new()),
        }
    }

    /// Builds the Fjall keyspace configuration.
    #[inline]
    pub(crate) fn keyspace_config(&self) -> Config {
        let mut config = Config::new(self.inner.db_path());
        config = config
            .manual_journal_persist(self.inner.manual_journal_persist())
            .flush_workers(self.inner.flush_workers())
            .compaction_workers(self.inner.compaction_workers())
            .cache_size(self.inner.block_cache_capacity() + self.inner.blob_cache_capacity())
            .max_journaling_size(self.inner.max_journaling_size())
            .max_write_buffer_size(self.inner.max_write_buffer_size());

        if self.inner.fsync_frequency() > 0 {
            config = config.fsync_ms(Some(self.inner.fsync_frequency()));
        }
        config
    }

    /// Builds the options of the document partition.
    #[inline]
    pub(crate) fn partition_config(&self) -> PartitionCreateOptions {
        let mut config = PartitionCreateOptions::default();
        config = config
            .bloom_filter_bits(if self.inner.bloom_filter_bits() == -1 {
                None
            } else {
                Some(self.inner.bloom_filter_bits() as u8)
            })
            .compression(self.inner.compression_type())
            .max_memtable_size(self.inner.max_memtable_size())
            .block_size(self.inner.block_size());

        if self.inner.kv_separated() {
            config = config.with_kv_separation(KvSeparationOptions::default());
        }
        config
    }

    #[inline]
    pub fn db_path(&self) -> &str {
        self.inner.db_path()
    }

    /// Sets the database directory. Only the first call takes effect.
    #[inline]
    pub(crate) fn set_db_path(&self, db_path: &str) {
        self.inner.set_db_path(db_path)
    }

    #[inline]
    pub fn manual_journal_persist(&self) -> bool {
        self.inner.manual_journal_persist.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_manual_journal_persist(&self, v: bool) {
        self.inner.manual_journal_persist.store(v, Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_workers(&self) -> usize {
        self.inner.flush_workers()
    }

    #[inline]
    pub(crate) fn set_flush_workers(&self, c: usize) {
        self.inner.flush_workers_count.store(c, Ordering::Relaxed)
    }

    #[inline]
    pub fn compaction_workers(&self) -> usize {
        self.inner.compaction_workers()
    }

    #[inline]
    pub(crate) fn set_compaction_workers(&self, c: usize) {
        self.inner.compaction_workers_count.store(c, Ordering::Relaxed)
    }

    #[inline]
    pub fn block_cache_capacity(&self) -> u64 {
        self.inner.block_cache_capacity()
    }

    #[inline]
    pub(crate) fn set_block_cache_capacity(&self, c: u64) {
        self.inner.block_cache_capacity.store(c, Ordering::Relaxed)
    }

    #[inline]
    pub fn blob_cache_capacity(&self) -> u64 {
        self.inner.blob_cache_capacity()
    }

    #[inline]
    pub(crate) fn set_blob_cache_capacity(&self, c: u64) {
        self.inner.blob_cache_capacity.store(c, Ordering::Relaxed)
    }

    #[inline]
    pub fn max_journaling_size(&self) -> u64 {
        self.inner.max_journaling_size()
    }

    #[inline]
    pub(crate) fn set_max_journaling_size(&self, s: u64) {
        self.inner.max_journaling_size.store(s, Ordering::Relaxed)
    }

    #[inline]
    pub fn max_write_buffer_size(&self) -> u64 {
        self.inner.max_write_buffer_size()
    }

    #[inline]
    pub(crate) fn set_max_write_buffer_size(&self, s: u64) {
        self.inner.max_write_buffer_size.store(s, Ordering::Relaxed)
    }

    /// Background fsync interval in milliseconds, `0` when disabled.
    #[inline]
    pub fn fsync_frequency(&self) -> u16 {
        self.inner.fsync_frequency()
    }

    #[inline]
    pub(crate) fn set_fsync_frequency(&self, f: u16) {
        self.inner.fsync_frequency.store(f, Ordering::Relaxed)
    }

    /// Whether `close` and drop persist the journal first.
    #[inline]
    pub fn commit_before_close(&self) -> bool {
        self.inner.commit_before_close.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_commit_before_close(&self, v: bool) {
        self.inner.commit_before_close.store(v, Ordering::Relaxed)
    }

    /// Bloom filter bits per key, `-1` when disabled.
    #[inline]
    pub fn bloom_filter_bits(&self) -> i8 {
        self.inner.bloom_filter_bits()
    }

    #[inline]
    pub(crate) fn set_bloom_filter_bits(&self, b: i8) {
        self.inner.bloom_filter_bits.store(b, Ordering::Relaxed)
    }

    #[inline]
    pub fn compression_type(&self) -> CompressionType {
        self.inner.compression_type()
    }

    #[inline]
    pub(crate) fn set_compression_type(&self, ct: CompressionType) {
        *self.inner.compression_type.write() = ct;
    }

    #[inline]
    pub fn max_memtable_size(&self) -> u32 {
        self.inner.max_memtable_size()
    }

    #[inline]
    pub(crate) fn set_max_memtable_size(&self, s: u32) {
        self.inner.max_memtable_size.store(s, Ordering::Relaxed)
    }

    #[inline]
    pub fn block_size(&self) -> u32 {
        self.inner.block_size()
    }

    #[inline]
    pub(crate) fn set_block_size(&self, s: u32) {
        self.inner.block_size.store(s, Ordering::Relaxed)
    }

    /// Whether large values are stored apart from the LSM tree.
    #[inline]
    pub fn kv_separated(&self) -> bool {
        self.inner.kv_separated()
    }

    #[inline]
    pub(crate) fn set_kv_separated(&self, v: bool) {
        self.inner.kv_separated.store(v, Ordering::Relaxed)
    }
}

impl Default for FjallConfig {
    fn default() -> Self {
        FjallConfig::new()
    }
}

struct FjallConfigInner {
    db_path: OnceLock<String>,
    manual_journal_persist: AtomicBool,
    flush_workers_count: AtomicUsize,
    compaction_workers_count: AtomicUsize,
    block_cache_capacity: AtomicU64,
    blob_cache_capacity: AtomicU64,
    max_journaling_size: AtomicU64,
    max_write_buffer_size: AtomicU64,
    fsync_frequency: AtomicU16,
    commit_before_close: AtomicBool,

    bloom_filter_bits: AtomicI8,
    compression_type: RwLock<CompressionType>,
    max_memtable_size: AtomicU32,
    block_size: AtomicU32,
    kv_separated: AtomicBool,
}

impl FjallConfigInner {
    pub const DEFAULT_BLOCK_CACHE_MB: u64 = 64;
    pub const DEFAULT_BLOB_CACHE_MB: u64 = 32;
    pub const DEFAULT_WRITE_BUFFER_MB: u64 = 128;
    pub const DEFAULT_MAX_JOURNALING_MB: u64 = 512;
    pub const DEFAULT_MEMTABLE_MB: u32 = 32;

    fn new() -> FjallConfigInner {
        let cpus = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(4);
        let flush_workers = cpus.max(1);
        let compaction_workers = (cpus / 2).max(1);

        FjallConfigInner {
            db_path: OnceLock::new(),
            manual_journal_persist: AtomicBool::new(false),
            flush_workers_count: AtomicUsize::new(flush_workers),
            compaction_workers_count: AtomicUsize::new(compaction_workers),
            block_cache_capacity: AtomicU64::new(Self::DEFAULT_BLOCK_CACHE_MB * 1_024 * 1_024),
            blob_cache_capacity: AtomicU64::new(Self::DEFAULT_BLOB_CACHE_MB * 1_024 * 1_024),
            max_journaling_size: AtomicU64::new(Self::DEFAULT_MAX_JOURNALING_MB * 1_024 * 1_024),
            max_write_buffer_size: AtomicU64::new(Self::DEFAULT_WRITE_BUFFER_MB * 1_024 * 1_024),
            fsync_frequency: AtomicU16::new(0),
            commit_before_close: AtomicBool::new(true),
            bloom_filter_bits: AtomicI8::new(10),
            compression_type: RwLock::new(CompressionType::Lz4),
            max_memtable_size: AtomicU32::new(Self::DEFAULT_MEMTABLE_MB * 1_024 * 1_024),
            block_size: AtomicU32::new(4 * 1_024),
            kv_separated: AtomicBool::new(false),
        }
    }

    #[inline]
    fn db_path(&self) -> &str {
        self.db_path.get().map(String::as_str).unwrap_or("")
    }

    #[inline]
    fn set_db_path(&self, db_path: &str) {
        self.db_path.get_or_init(|| db_path.to_string());
    }

    #[inline]
    fn manual_journal_persist(&self) -> bool {
        self.manual_journal_persist.load(Ordering::Relaxed)
    }

    #[inline]
    fn flush_workers(&self) -> usize {
        self.flush_workers_count.load(Ordering::Relaxed)
    }

    #[inline]
    fn compaction_workers(&self) -> usize {
        self.compaction_workers_count.load(Ordering::Relaxed)
    }

    #[inline]
    fn block_cache_capacity(&self) -> u64 {
        self.block_cache_capacity.load(Ordering::Relaxed)
    }

    #[inline]
    fn blob_cache_capacity(&self) -> u64 {
        self.blob_cache_capacity.load(Ordering::Relaxed)
    }

    #[inline]
    fn max_journaling_size(&self) -> u64 {
        self.max_journaling_size.load(Ordering::Relaxed)
    }

    #[inline]
    fn max_write_buffer_size(&self) -> u64 {
        self.max_write_buffer_size.load(Ordering::Relaxed)
    }

    #[inline]
    fn fsync_frequency(&self) -> u16 {
        self.fsync_frequency.load(Ordering::Relaxed)
    }

    #[inline]
    fn bloom_filter_bits(&self) -> i8 {
        self.bloom_filter_bits.load(Ordering::Relaxed)
    }

    #[inline]
    fn compression_type(&self) -> CompressionType {
        self.compression_type.read().clone()
    }

    #[inline]
    fn max_memtable_size(&self) -> u32 {
        self.max_memtable_size.load(Ordering::Relaxed)
    }

    #[inline]
    fn block_size(&self) -> u32 {
        self.block_size.load(Ordering::Relaxed)
    }

    #[inline]
    fn kv_separated(&self) -> bool {
        self.kv_separated.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        colog::init();
    }

    #[test]
    fn test_fjall_config_defaults() {
        let config = FjallConfig::new();
        assert_eq!(config.db_path(), "");
        assert!(!config.manual_journal_persist());
        assert!(config.flush_workers() >= 1);
        assert!(config.compaction_workers() >= 1);
        assert_eq!(config.block_cache_capacity(), 64 * 1024 * 1024);
        assert_eq!(config.blob_cache_capacity(), 32 * 1024 * 1024);
        assert_eq!(config.max_journaling_size(), 512 * 1024 * 1024);
        assert_eq!(config.max_write_buffer_size(), 128 * 1024 * 1024);
        assert_eq!(config.fsync_frequency(), 0);
        assert!(config.commit_before_close());
        assert_eq!(config.bloom_filter_bits(), 10);
        assert_eq!(config.compression_type(), CompressionType::Lz4);
        assert_eq!(config.max_memtable_size(), 32 * 1024 * 1024);
        assert_eq!(config.block_size(), 4 * 1024);
        assert!(!config.kv_separated());
    }

    #[test]
    fn test_db_path_is_set_once() {
        let config = FjallConfig::new();
        config.set_db_path("first");
        config.set_db_path("second");
        assert_eq!(config.db_path(), "first");
    }

    #[test]
    fn test_setters() {
        let config = FjallConfig::new();
        config.set_manual_journal_persist(true);
        config.set_flush_workers(3);
        config.set_compaction_workers(2);
        config.set_block_cache_capacity(1);
        config.set_blob_cache_capacity(2);
        config.set_max_journaling_size(3);
        config.set_max_write_buffer_size(4);
        config.set_fsync_frequency(5);
        config.set_commit_before_close(false);
        config.set_bloom_filter_bits(-1);
        config.set_compression_type(CompressionType::None);
        config.set_max_memtable_size(6);
        config.set_block_size(7);
        config.set_kv_separated(true);

        assert!(config.manual_journal_persist());
        assert_eq!(config.flush_workers(), 3);
        assert_eq!(config.compaction_workers(), 2);
        assert_eq!(config.block_cache_capacity(), 1);
        assert_eq!(config.blob_cache_capacity(), 2);
        assert_eq!(config.max_journaling_size(), 3);
        assert_eq!(config.max_write_buffer_size(), 4);
        assert_eq!(config.fsync_frequency(), 5);
        assert!(!config.commit_before_close());
        assert_eq!(config.bloom_filter_bits(), -1);
        assert_eq!(config.compression_type(), CompressionType::None);
        assert_eq!(config.max_memtable_size(), 6);
        assert_eq!(config.block_size(), 7);
        assert!(config.kv_separated());
    }

    #[test]
    fn test_clones_share_settings() {
        let config = FjallConfig::new();
        let clone = config.clone();
        clone.set_flush_workers(9);
        assert_eq!(config.flush_workers(), 9);
    }

    #[test]
    fn test_keyspace_and_partition_config_build() {
        let config = FjallConfig::new();
        config.set_db_path("unused-path");
        config.set_fsync_frequency(100);
        config.set_kv_separated(true);
        let _keyspace = config.keyspace_config();
        let _partition = config.partition_config();
    }
}
