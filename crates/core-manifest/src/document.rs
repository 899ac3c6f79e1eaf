//! Catalog and promotion documents
//!
//! A **Catalog** lists the Warehouses of one or more projects. A **Promotion
//! document** is the snapshot resolution works from: a Stage's Requirements
//! plus the Freight already associated with the promotion.
//!
//! Both documents are read from JSON or TOML, picked by file extension.

use crate::error::{Error, Result};
use crate::freight::FreightReference;
use crate::origin::Requirement;
use crate::validate::{validate_catalog, validate_promotion};
use crate::warehouse::Warehouse;
use crate::{CATALOG_SCHEMA_VERSION, PROMOTION_SCHEMA_VERSION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(DocumentFormat::Json),
            Some("toml") => Ok(DocumentFormat::Toml),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Warehouses known to a directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    /// Schema version identifier
    pub schema: String,

    /// Namespace applied to Warehouses that do not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_namespace: Option<String>,

    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            schema: CATALOG_SCHEMA_VERSION.to_string(),
            default_namespace: None,
            warehouses: Vec::new(),
        }
    }

    pub fn with_default_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    pub fn add_warehouse(&mut self, warehouse: Warehouse) {
        self.warehouses.push(warehouse);
    }

    /// Fill in the namespace of Warehouses that omitted it
    pub fn apply_default_namespace(&mut self, fallback: &str) {
        let namespace = self
            .default_namespace
            .clone()
            .unwrap_or_else(|| fallback.to_string());
        for warehouse in &mut self.warehouses {
            if warehouse.namespace.is_empty() {
                warehouse.namespace = namespace.clone();
            }
        }
    }

    /// Save the catalog; format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_document(path.as_ref(), self)
    }

    /// Load, version-check and validate a catalog
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let catalog: Catalog = read_document(path.as_ref())?;
        if catalog.schema != CATALOG_SCHEMA_VERSION {
            return Err(Error::version_mismatch(CATALOG_SCHEMA_VERSION, catalog.schema.as_str()));
        }
        validate_catalog(&catalog)?;
        Ok(catalog)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Requirements and associated Freight for one promotion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromotionDocument {
    /// Schema version identifier
    pub schema: String,

    /// Project (namespace) the Stage lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Stage being promoted to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(default)]
    pub requirements: Vec<Requirement>,

    #[serde(default)]
    pub freight: Vec<FreightReference>,
}

impl PromotionDocument {
    pub fn new() -> Self {
        Self {
            schema: PROMOTION_SCHEMA_VERSION.to_string(),
            project: None,
            stage: None,
            requirements: Vec::new(),
            freight: Vec::new(),
        }
    }

    pub fn with_project<S: Into<String>>(mut self, project: S) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_stage<S: Into<String>>(mut self, stage: S) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_freight(mut self, freight: FreightReference) -> Self {
        self.freight.push(freight);
        self
    }

    /// Save the document; format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_document(path.as_ref(), self)
    }

    /// Load, version-check and validate a promotion document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc: PromotionDocument = read_document(path.as_ref())?;
        if doc.schema != PROMOTION_SCHEMA_VERSION {
            return Err(Error::version_mismatch(PROMOTION_SCHEMA_VERSION, doc.schema.as_str()));
        }
        validate_promotion(&doc)?;
        Ok(doc)
    }
}

impl Default for PromotionDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::document_not_found(path));
    }
    let format = DocumentFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    let doc = match format {
        DocumentFormat::Json => serde_json::from_str(&contents)?,
        DocumentFormat::Toml => toml::from_str(&contents)?,
    };
    Ok(doc)
}

fn write_document<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let contents = match DocumentFormat::from_path(path)? {
        DocumentFormat::Json => serde_json::to_string_pretty(doc)?,
        DocumentFormat::Toml => toml::to_string_pretty(doc)?,
    };
    std::fs::write(path, contents)?;
    Ok(())
}
