//! Catalog-backed Warehouse directory

use super::memory::InMemoryDirectory;
use async_trait::async_trait;
use freightyard_core_interface::{Result, WarehouseDirectory, WarehouseKey};
use freightyard_core_manifest::{validate_catalog, Catalog, Warehouse};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serves Warehouses from a catalog document loaded once at startup.
///
/// The catalog is a snapshot; edits to the file after loading are not seen.
#[derive(Debug, Clone)]
pub struct CatalogDirectory {
    source: Option<PathBuf>,
    inner: InMemoryDirectory,
}

impl CatalogDirectory {
    /// Build from an already-parsed catalog.
    ///
    /// Warehouses without a namespace land in the catalog's default namespace,
    /// or `default_namespace` when the catalog names none. The catalog is
    /// validated again once namespaces are filled in, so a Warehouse that only
    /// collides after defaulting is rejected instead of replacing another.
    pub fn from_catalog(
        mut catalog: Catalog,
        default_namespace: &str,
    ) -> freightyard_core_manifest::Result<Self> {
        catalog.apply_default_namespace(default_namespace);
        validate_catalog(&catalog)?;
        Ok(Self {
            source: None,
            inner: catalog.warehouses.into_iter().collect(),
        })
    }

    /// Load and validate a catalog file (JSON or TOML)
    pub fn load<P: AsRef<Path>>(
        path: P,
        default_namespace: &str,
    ) -> freightyard_core_manifest::Result<Self> {
        let path = path.as_ref();
        let catalog = Catalog::load(path)?;
        let count = catalog.warehouses.len();
        let mut directory = Self::from_catalog(catalog, default_namespace)?;
        directory.source = Some(path.to_path_buf());
        info!(path = %path.display(), warehouses = count, "loaded warehouse catalog");
        Ok(directory)
    }

    /// File the catalog was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl WarehouseDirectory for CatalogDirectory {
    async fn get(&self, key: &WarehouseKey) -> Result<Option<Warehouse>> {
        let warehouse = self.inner.get(key).await?;
        if warehouse.is_none() {
            debug!(warehouse = %key, "warehouse not in catalog");
        }
        Ok(warehouse)
    }
}
