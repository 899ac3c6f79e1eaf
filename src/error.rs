/*!
 * Error types for Freightyard
 *
 * Resolution distinguishes three outcomes callers must handle differently:
 * - operational failures (the Warehouse directory could not be queried)
 * - configuration errors (missing Warehouse, ambiguous request, undecidable chart)
 * - absence, which is not an error and is returned as `Ok(None)`
 */

use freightyard_core_interface::DirectoryError;
use freightyard_core_manifest::{ArtifactKind, Origin};
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ABSENT: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_CONFIG: i32 = 3;

/// Two Requirements whose Warehouses could both supply the same artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    pub kind: ArtifactKind,
    /// Repository URL as the caller or the Warehouse spelled it
    pub repo_url: String,
    /// Origin that matched first
    pub first: Origin,
    /// Origin that matched second
    pub second: Origin,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "multiple requested Freight could potentially provide a {} \
             from repository {} ({} and {}): \
             please provide a Freight origin to disambiguate",
            self.kind.describe(),
            self.repo_url,
            self.first,
            self.second
        )
    }
}

/// Errors from origin resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The Warehouse directory could not be queried
    #[error("error getting Warehouse {warehouse:?} in namespace {namespace:?}: {source}")]
    Lookup {
        warehouse: String,
        namespace: String,
        #[source]
        source: DirectoryError,
    },

    /// A Requirement names a Warehouse that does not exist
    #[error("Warehouse {warehouse:?} not found in namespace {namespace:?}")]
    WarehouseNotFound { warehouse: String, namespace: String },

    /// More than one Requirement could supply the artifact
    #[error("{0}")]
    Ambiguous(Ambiguity),

    /// No Requirement can supply the requested chart
    #[error("{}", chart_not_found_message(.repo_url, .chart.as_deref()))]
    ChartNotFound {
        repo_url: String,
        chart: Option<String>,
    },
}

fn chart_not_found_message(repo_url: &str, chart: Option<&str>) -> String {
    match chart {
        Some(name) => format!(
            "chart {:?} from repo {} not found in referenced Freight",
            name, repo_url
        ),
        None => format!("chart from repo {} not found in referenced Freight", repo_url),
    }
}

/// Error category for logging and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Directory lookup failed; worth retrying later
    Lookup,
    /// Stage or Warehouse configuration must be fixed
    Configuration,
    /// Operator must name an origin explicitly
    Ambiguity,
    /// Requested artifact cannot be located
    NotFound,
}

impl ResolveError {
    pub(crate) fn lookup(origin: &Origin, namespace: &str, source: DirectoryError) -> Self {
        ResolveError::Lookup {
            warehouse: origin.name.clone(),
            namespace: namespace.to_string(),
            source,
        }
    }

    pub(crate) fn warehouse_not_found(origin: &Origin, namespace: &str) -> Self {
        ResolveError::WarehouseNotFound {
            warehouse: origin.name.clone(),
            namespace: namespace.to_string(),
        }
    }

    pub(crate) fn chart_not_found(repo_url: &str, chart: &str) -> Self {
        ResolveError::ChartNotFound {
            repo_url: repo_url.to_string(),
            chart: (!chart.is_empty()).then(|| chart.to_string()),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolveError::Lookup { .. } => ErrorCategory::Lookup,
            ResolveError::WarehouseNotFound { .. } => ErrorCategory::Configuration,
            ResolveError::Ambiguous(_) => ErrorCategory::Ambiguity,
            ResolveError::ChartNotFound { .. } => ErrorCategory::NotFound,
        }
    }

    pub fn is_ambiguity(&self) -> bool {
        matches!(self, ResolveError::Ambiguous(_))
    }

    /// True for the chart not-found outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::ChartNotFound { .. })
    }

    /// Check if this error is transient (temporary, worth retrying)
    pub fn is_transient(&self) -> bool {
        match self {
            ResolveError::Lookup { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Lookup => EXIT_FATAL,
            ErrorCategory::Configuration | ErrorCategory::Ambiguity | ErrorCategory::NotFound => {
                EXIT_CONFIG
            }
        }
    }
}

impl From<Ambiguity> for ResolveError {
    fn from(ambiguity: Ambiguity) -> Self {
        ResolveError::Ambiguous(ambiguity)
    }
}

/// Errors surfaced by the `freightyard` command
#[derive(Error, Debug)]
pub enum FreightyardError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Document(#[from] freightyard_core_manifest::Error),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Warehouse lookups did not finish within {0:?}")]
    Timeout(Duration),
}

impl FreightyardError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FreightyardError::Resolve(err) => err.exit_code(),
            _ => EXIT_FATAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, FreightyardError>;
