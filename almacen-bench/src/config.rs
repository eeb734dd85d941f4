//! Benchmark configuration

/// Storage backend type for benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory storage (fast, no persistence)
    InMemory,
    /// Fjall persistent storage
    Fjall,
}

impl StoreType {
    pub const ALL: [StoreType; 2] = [StoreType::InMemory, StoreType::Fjall];
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::InMemory => write!(f, "inmemory"),
            StoreType::Fjall => write!(f, "fjall"),
        }
    }
}

/// Configuration for benchmark runs
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Document counts to benchmark
    pub document_counts: Vec<usize>,
    /// Nesting depths for field path benchmarks
    pub path_depths: Vec<usize>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            document_counts: vec![100, 1_000, 10_000],
            path_depths: vec![1, 4, 16],
        }
    }
}

impl BenchmarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quick config with smaller counts for fast runs
    pub fn quick() -> Self {
        Self {
            document_counts: vec![100, 1_000],
            path_depths: vec![1, 4],
        }
    }
}
