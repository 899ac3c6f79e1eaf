//! Freight origin resolution
//!
//! A [`Resolver`] answers "which artifact from which Origin?" for one
//! promotion: it is bound to a Warehouse directory, the project namespace and
//! the Stage's ordered Requirements, and holds no state between calls.
//!
//! Each `find_*` operation first resolves the Origin (see
//! [`Resolver::resolve_origin`]) and then looks the artifact up in the Freight
//! pool handed in by the caller. Results borrow from that pool.

mod matcher;
mod origin;
mod preflight;
mod selector;

pub use matcher::{match_chart, match_commit, match_freight, match_image};
pub use selector::ArtifactSelector;

use crate::error::ResolveError;
use freightyard_core_interface::WarehouseDirectory;
use freightyard_core_manifest::{Chart, FreightReference, GitCommit, Image, Origin, Requirement};

/// Origin resolution for one promotion's Requirements
pub struct Resolver<'a, D: ?Sized> {
    directory: &'a D,
    project: &'a str,
    requirements: &'a [Requirement],
}

impl<'a, D: WarehouseDirectory + ?Sized> Resolver<'a, D> {
    pub fn new(directory: &'a D, project: &'a str, requirements: &'a [Requirement]) -> Self {
        Self {
            directory,
            project,
            requirements,
        }
    }

    pub fn project(&self) -> &str {
        self.project
    }

    pub fn requirements(&self) -> &[Requirement] {
        self.requirements
    }

    /// Find the commit from `repo_url` in the associated Freight.
    ///
    /// `Ok(None)` when no Origin can be identified or it has not contributed
    /// a matching commit yet.
    pub async fn find_commit<'f>(
        &self,
        desired: Option<&Origin>,
        freight: &'f [FreightReference],
        repo_url: &str,
    ) -> Result<Option<&'f GitCommit>, ResolveError> {
        let selector = ArtifactSelector::commit(repo_url);
        Ok(self
            .resolve_origin(desired, &selector)
            .await?
            .and_then(|origin| match_commit(&origin, freight, &selector)))
    }

    /// Find the container image from `repo_url` in the associated Freight
    pub async fn find_image<'f>(
        &self,
        desired: Option<&Origin>,
        freight: &'f [FreightReference],
        repo_url: &str,
    ) -> Result<Option<&'f Image>, ResolveError> {
        let selector = ArtifactSelector::image(repo_url);
        Ok(self
            .resolve_origin(desired, &selector)
            .await?
            .and_then(|origin| match_image(&origin, freight, &selector)))
    }

    /// Find chart `chart_name` from `repo_url` in the associated Freight.
    ///
    /// Unlike commits and images, failing to identify any Origin is an error
    /// (`ResolveError::ChartNotFound`). Once the Origin is known, a chart
    /// missing from the pool is still `Ok(None)`.
    pub async fn find_chart<'f>(
        &self,
        desired: Option<&Origin>,
        freight: &'f [FreightReference],
        repo_url: &str,
        chart_name: &str,
    ) -> Result<Option<&'f Chart>, ResolveError> {
        let selector = ArtifactSelector::chart(repo_url, chart_name);
        Ok(self
            .resolve_origin(desired, &selector)
            .await?
            .and_then(|origin| match_chart(&origin, freight, &selector)))
    }
}
