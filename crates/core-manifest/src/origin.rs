//! Origins and the Requirements that name them
//!
//! An [`Origin`] identifies where Freight came from. A Stage declares an ordered
//! list of [`Requirement`]s, one per Origin it accepts Freight from.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of resource that produces Freight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OriginKind {
    /// A Warehouse subscribing to upstream repositories
    #[default]
    Warehouse,
}

impl OriginKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            OriginKind::Warehouse => "Warehouse",
        }
    }
}

impl FromStr for OriginKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Warehouse" | "warehouse" => Ok(OriginKind::Warehouse),
            _ => Err(Error::InvalidOriginKind(s.to_string())),
        }
    }
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a piece of Freight.
///
/// Two origins are equal iff both kind and name match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// Kind of the producing resource
    #[serde(default)]
    pub kind: OriginKind,

    /// Name of the producing resource
    pub name: String,
}

impl Origin {
    pub fn new<S: Into<String>>(kind: OriginKind, name: S) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Origin for the named Warehouse
    pub fn warehouse<S: Into<String>>(name: S) -> Self {
        Self::new(OriginKind::Warehouse, name)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Where a Stage may obtain the requested Freight from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequirementSources {
    /// Freight may come straight from the Origin
    #[serde(default)]
    pub direct: bool,

    /// Upstream Stages Freight may be promoted from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<String>,
}

/// A Stage's need for Freight from one Origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub origin: Origin,

    #[serde(default)]
    pub sources: RequirementSources,
}

impl Requirement {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            sources: RequirementSources::default(),
        }
    }

    /// Requirement for Freight from the named Warehouse
    pub fn from_warehouse<S: Into<String>>(name: S) -> Self {
        Self::new(Origin::warehouse(name))
    }

    pub fn with_direct(mut self) -> Self {
        self.sources.direct = true;
        self
    }

    pub fn with_upstream_stage<S: Into<String>>(mut self, stage: S) -> Self {
        self.sources.stages.push(stage.into());
        self
    }
}
