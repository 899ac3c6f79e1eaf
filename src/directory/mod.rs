//! Warehouse directory implementations
//!
//! This module provides concrete implementations of the `WarehouseDirectory` trait:
//! - `InMemoryDirectory`: Warehouses held in memory; the building block for tests
//! - `CatalogDirectory`: Warehouses loaded from a catalog document on disk

mod catalog;
mod memory;

pub use catalog::CatalogDirectory;
pub use memory::InMemoryDirectory;
