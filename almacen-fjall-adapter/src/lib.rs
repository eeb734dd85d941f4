//! Durable storage backend for almacen on the [Fjall](https://docs.rs/fjall)
//! LSM-tree engine.
//!
//! ```rust,no_run
//! use almacen::store::StoreModule;
//! use almacen_fjall_adapter::FjallModule;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FjallModule::with_config()
//!     .db_path("/tmp/almacen")
//!     .build()
//!     .get_store()?;
//! store.open_or_create()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod module;
mod store;
mod wrapper;

pub use config::*;
pub use module::*;
pub use store::*;
