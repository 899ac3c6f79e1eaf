/*!
 * Freightyard - Freight origin resolution
 *
 * Works out which upstream Warehouse a promotion step should take an
 * artifact from:
 * - Origin disambiguation across a Stage's Freight requirements
 * - Commit, image, and chart lookup in the associated Freight pool
 * - Ambiguity preflight for container image requests
 * - Pluggable Warehouse directory (in-memory or catalog file)
 */

pub mod cli_style;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod output;
pub mod resolve;

// Re-export commonly used types
pub use config::{CliConfig, OutputFormat};
pub use directory::{CatalogDirectory, InMemoryDirectory};
pub use error::{Ambiguity, ErrorCategory, FreightyardError, ResolveError, Result};
pub use resolve::{
    match_chart, match_commit, match_freight, match_image, ArtifactSelector, Resolver,
};

pub use freightyard_core_interface::{WarehouseDirectory, WarehouseKey};
pub use freightyard_core_manifest::{
    normalize_repo_url, Catalog, Chart, FreightReference, GitCommit, Image, Origin, OriginKind,
    PromotionDocument, Requirement, Warehouse,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
