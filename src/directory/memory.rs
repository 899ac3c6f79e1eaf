//! In-memory Warehouse directory

use async_trait::async_trait;
use freightyard_core_interface::{DirectoryError, Result, WarehouseDirectory, WarehouseKey};
use freightyard_core_manifest::Warehouse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Warehouses stored in a shared map keyed by namespace and name
///
/// # Example
///
/// ```rust
/// use freightyard::directory::InMemoryDirectory;
/// use freightyard_core_manifest::{Subscription, Warehouse};
///
/// let directory = InMemoryDirectory::new();
/// directory.insert(
///     Warehouse::new("demo", "web").with_subscription(Subscription::image("docker.io/org/web")),
/// );
/// assert_eq!(directory.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    warehouses: Arc<RwLock<HashMap<WarehouseKey, Warehouse>>>,
}

impl InMemoryDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a Warehouse
    pub fn insert(&self, warehouse: Warehouse) {
        let key = WarehouseKey::of(&warehouse);
        let mut warehouses = self.warehouses.write().unwrap_or_else(|e| e.into_inner());
        warehouses.insert(key, warehouse);
    }

    /// Remove a Warehouse, returning it if present
    pub fn remove(&self, key: &WarehouseKey) -> Option<Warehouse> {
        let mut warehouses = self.warehouses.write().unwrap_or_else(|e| e.into_inner());
        warehouses.remove(key)
    }

    pub fn len(&self) -> usize {
        self.warehouses.read().map(|w| w.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Warehouse> for InMemoryDirectory {
    fn from_iter<I: IntoIterator<Item = Warehouse>>(iter: I) -> Self {
        let directory = Self::new();
        for warehouse in iter {
            directory.insert(warehouse);
        }
        directory
    }
}

#[async_trait]
impl WarehouseDirectory for InMemoryDirectory {
    async fn get(&self, key: &WarehouseKey) -> Result<Option<Warehouse>> {
        let warehouses = self
            .warehouses
            .read()
            .map_err(|_| DirectoryError::Unavailable("warehouse map lock poisoned".to_string()))?;
        Ok(warehouses.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freightyard_core_manifest::Subscription;

    #[tokio::test]
    async fn test_get_by_namespace_and_name() {
        let directory: InMemoryDirectory = vec![
            Warehouse::new("one", "web")
                .with_subscription(Subscription::image("docker.io/org/web")),
            Warehouse::new("two", "web"),
        ]
        .into_iter()
        .collect();

        let found = directory.get(&WarehouseKey::new("one", "web")).await.unwrap().unwrap();
        assert_eq!(found.subscriptions.len(), 1);

        let other = directory.get(&WarehouseKey::new("two", "web")).await.unwrap().unwrap();
        assert!(other.subscriptions.is_empty());

        assert!(directory.get(&WarehouseKey::new("three", "web")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_and_remove() {
        let directory = InMemoryDirectory::new();
        directory.insert(Warehouse::new("demo", "web"));
        directory.insert(
            Warehouse::new("demo", "web").with_subscription(Subscription::git("https://x/y")),
        );
        assert_eq!(directory.len(), 1);

        let key = WarehouseKey::new("demo", "web");
        let removed = directory.remove(&key).unwrap();
        assert_eq!(removed.subscriptions.len(), 1);
        assert!(directory.is_empty());
        assert!(directory.get(&key).await.unwrap().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let directory = InMemoryDirectory::new();
        let shared = directory.clone();
        shared.insert(Warehouse::new("demo", "web"));
        assert_eq!(directory.len(), 1);
    }
}
