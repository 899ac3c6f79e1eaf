//! Core Freight data structures for Freightyard
//!
//! This crate holds the data model that origin resolution works over.
//!
//! # Key Concepts
//!
//! - **Origin**: the Warehouse that produced a piece of Freight
//! - **Requirement**: a Stage's need for Freight from one Origin
//! - **Warehouse**: a set of git, image and chart subscriptions
//! - **Freight Reference**: an immutable bundle of commits, images and charts from one Origin
//!
//! Repository URLs are always compared through [`normalize_repo_url`].
//!
//! # Example
//!
//! ```no_run
//! use freightyard_core_manifest::{Catalog, Subscription, Warehouse};
//!
//! let mut catalog = Catalog::new().with_default_namespace("demo");
//! catalog.add_warehouse(
//!     Warehouse::new("", "web").with_subscription(Subscription::image("docker.io/org/web")),
//! );
//! catalog.save("catalog.toml").unwrap();
//! ```

pub mod document;
pub mod error;
pub mod freight;
pub mod origin;
pub mod repo_url;
pub mod validate;
pub mod warehouse;

// Re-export main types for convenience
pub use document::{Catalog, DocumentFormat, PromotionDocument};
pub use error::{Error, Result};
pub use freight::{Chart, FreightReference, GitCommit, Image};
pub use origin::{Origin, OriginKind, Requirement, RequirementSources};
pub use repo_url::{normalize_repo_url, same_repo};
pub use validate::{validate_catalog, validate_promotion, validate_warehouse};
pub use warehouse::{
    ArtifactKind, ChartSubscription, GitSubscription, ImageSubscription, Subscription, Warehouse,
};

/// Schema version for catalog documents
pub const CATALOG_SCHEMA_VERSION: &str = "freightyard.catalog.v1";

/// Schema version for promotion documents
pub const PROMOTION_SCHEMA_VERSION: &str = "freightyard.promotion.v1";
