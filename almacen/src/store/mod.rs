//! Storage backends and the contract they share.
//!
//! # Backends
//!
//! Every backend implements [`DocumentStoreProvider`] and is handed out by a
//! [`StoreModule`] wrapped in a [`DocumentStore`]:
//! - **In-Memory Store**: [`memory::InMemoryStoreModule`], volatile, for tests
//!   and deployments without persistence
//! - **Fjall Store**: `almacen-fjall-adapter`, durable LSM-based storage
//!
//! # Field paths
//!
//! Nested field access goes through [`traversal`], which both backends call
//! so they agree on every edge case.

mod document_store;
pub mod memory;
mod store_module;
pub mod traversal;

pub use document_store::*;
pub use store_module::*;
