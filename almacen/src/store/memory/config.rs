/// Configuration for an in-memory store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryStoreConfig {
    initial_capacity: usize,
}

impl InMemoryStoreConfig {
    pub fn new() -> InMemoryStoreConfig {
        InMemoryStoreConfig {
            initial_capacity: 16,
        }
    }

    /// Number of collections the store can hold before its table first grows.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub(crate) fn set_initial_capacity(&mut self, capacity: usize) {
        self.initial_capacity = capacity;
    }
}

impl Default for InMemoryStoreConfig {
    fn default() -> Self {
        InMemoryStoreConfig::new()
    }
}
