//! Almacen Benchmark Library
//!
//! Provides benchmark infrastructure for measuring the document store
//! contract across storage backends.

pub mod config;
pub mod data_gen;
pub mod stores;
