//! # Almacen - Schemaless Document Store
//!
//! Almacen stores schemaless documents grouped into collections, and lets
//! callers address not only whole documents by `_id` but any nested field
//! inside them through a dot-separated path such as `x.y.z`.
//!
//! ## Key Features
//!
//! - **Seven-operation contract**: find all, find by id, save, delete, and
//!   find/update/delete of a single nested field
//! - **Interchangeable backends**: an in-memory engine in this crate, a durable
//!   LSM-based engine in `almacen-fjall-adapter`
//! - **Typed errors**: every failure maps to a fixed [`errors::ErrorKind`]
//!   carrying an external status
//! - **Copy semantics**: documents returned by a store never alias its state
//!
//! ## Quick Start
//!
//! ```rust
//! use almacen::common::Value;
//! use almacen::context::Context;
//! use almacen::doc;
//! use almacen::store::memory::InMemoryStoreModule;
//! use almacen::store::StoreModule;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStoreModule::with_config().build().get_store()?;
//! store.open_or_create()?;
//!
//! let ctx = Context::new();
//! store.save(&ctx, "users", doc!{ "_id": "ID", "x": { "y": { "z": 12 } } })?;
//!
//! let z = store.find_field(&ctx, "users", "ID", "x.y.z")?;
//! assert_eq!(z, Value::from(12));
//!
//! store.update_field(&ctx, "users", "ID", "x.y.z", "CHANGED".into())?;
//! store.delete_field(&ctx, "users", "ID", "x.y")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents and collections
//! - [`common`] - Value model, field paths and constants
//! - [`config`] - Service configuration
//! - [`context`] - Per-request execution context and logging
//! - [`errors`] - Error types and result definitions
//! - [`store`] - The store contract, traversal, and the in-memory engine

pub mod collection;
pub mod common;
pub mod config;
pub mod context;
pub mod errors;
pub mod store;
