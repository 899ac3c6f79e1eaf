//! Freightyard Core Interface: the Warehouse Directory
//!
//! This crate defines the `WarehouseDirectory` trait, the read-only view of
//! Warehouse definitions that origin resolution consults. The resolver never
//! reaches for a global client; it is handed a directory, so it runs the same
//! against a cluster-backed store, a catalog file or an in-memory fake.
//!
//! # Contract
//!
//! - `Ok(Some(warehouse))`: the Warehouse exists
//! - `Ok(None)`: no such Warehouse in that namespace
//! - `Err(_)`: the directory could not be queried
//!
//! Implementations do not retry. Deadlines and backoff belong to the caller,
//! who can drop the returned future to cancel a lookup.
//!
//! # Example
//!
//! ```rust,no_run
//! use freightyard_core_interface::{WarehouseDirectory, WarehouseDirectoryExt, WarehouseKey};
//!
//! async fn count_subscriptions<D: WarehouseDirectory>(directory: &D) -> usize {
//!     let key = WarehouseKey::new("demo", "web");
//!     match directory.subscriptions(&key).await {
//!         Ok(Some(subs)) => subs.len(),
//!         _ => 0,
//!     }
//! }
//! ```

use async_trait::async_trait;
use freightyard_core_manifest::{Subscription, Warehouse};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Warehouse directory unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed Warehouse definition: {0}")]
    Parse(String),

    #[error("Lookup cancelled")]
    Cancelled,
}

impl DirectoryError {
    /// Whether a later attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            DirectoryError::Unavailable(_) | DirectoryError::Cancelled => true,
            DirectoryError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionRefused
            ),
            DirectoryError::Parse(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Identifies a Warehouse: a name within a project namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WarehouseKey {
    pub namespace: String,
    pub name: String,
}

impl WarehouseKey {
    pub fn new<S: Into<String>>(namespace: S, name: S) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key under which a Warehouse is stored
    pub fn of(warehouse: &Warehouse) -> Self {
        Self::new(warehouse.namespace.as_str(), warehouse.name.as_str())
    }
}

impl fmt::Display for WarehouseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Read-only lookup of Warehouse definitions
///
/// Implementations must be `Send + Sync` so one directory can serve many
/// concurrent resolutions.
#[async_trait]
pub trait WarehouseDirectory: Send + Sync {
    /// Fetch a Warehouse by namespace and name
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError` when the directory itself cannot be queried.
    /// A missing Warehouse is `Ok(None)`, not an error.
    async fn get(&self, key: &WarehouseKey) -> Result<Option<Warehouse>>;
}

/// Convenience methods derived from [`WarehouseDirectory::get`]
#[async_trait]
pub trait WarehouseDirectoryExt: WarehouseDirectory {
    /// Subscriptions of a Warehouse, or `None` if it does not exist
    async fn subscriptions(&self, key: &WarehouseKey) -> Result<Option<Vec<Subscription>>> {
        Ok(self.get(key).await?.map(|warehouse| warehouse.subscriptions))
    }

    /// Whether the Warehouse exists
    async fn contains(&self, key: &WarehouseKey) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

// Blanket implementation for all WarehouseDirectory implementations
impl<T: WarehouseDirectory + ?Sized> WarehouseDirectoryExt for T {}

#[async_trait]
impl<T: WarehouseDirectory + ?Sized> WarehouseDirectory for Arc<T> {
    async fn get(&self, key: &WarehouseKey) -> Result<Option<Warehouse>> {
        (**self).get(key).await
    }
}

#[async_trait]
impl<T: WarehouseDirectory + ?Sized> WarehouseDirectory for Box<T> {
    async fn get(&self, key: &WarehouseKey) -> Result<Option<Warehouse>> {
        (**self).get(key).await
    }
}
