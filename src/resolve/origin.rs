//! Origin disambiguation
//!
//! Given a Stage's Requirements, decide which single Origin could supply an
//! artifact. There is no precedence among candidates: a second Origin able to
//! supply the same repository is an error, never a tie to break.

use super::selector::ArtifactSelector;
use super::Resolver;
use crate::error::{Ambiguity, ResolveError};
use freightyard_core_interface::{WarehouseDirectory, WarehouseDirectoryExt, WarehouseKey};
use freightyard_core_manifest::{Origin, OriginKind, Requirement, Subscription};
use tracing::{debug, trace};

impl<'a, D: WarehouseDirectory + ?Sized> Resolver<'a, D> {
    /// Determine the Origin that can provide the selected artifact.
    ///
    /// An explicit `desired` Origin is returned as-is without any lookups.
    /// Otherwise every Requirement's Warehouse is consulted in order:
    ///
    /// - `Ok(Some(origin))`: exactly one Origin subscribes to the repository
    /// - `Ok(None)`: no Origin does (commit and image selectors only)
    /// - `Err(ChartNotFound)`: no Origin does (chart selectors)
    /// - `Err(Ambiguous)`: a second, different Origin also subscribes
    ///
    /// Requirements that name the same Origin more than once count as one
    /// candidate and are never ambiguous with each other.
    pub async fn resolve_origin(
        &self,
        desired: Option<&Origin>,
        selector: &ArtifactSelector,
    ) -> Result<Option<Origin>, ResolveError> {
        if let Some(origin) = desired {
            trace!(%origin, %selector, "origin supplied by caller");
            return Ok(Some(origin.clone()));
        }

        let mut candidate: Option<&Origin> = None;
        for requirement in self.requirements {
            let subscriptions = self.subscriptions_for(requirement).await?;
            if !subscriptions
                .iter()
                .any(|sub| selector.matches_subscription(sub))
            {
                continue;
            }

            match candidate {
                Some(first) if *first != requirement.origin => {
                    return Err(Ambiguity {
                        kind: selector.kind(),
                        repo_url: selector.repo_url().to_string(),
                        first: first.clone(),
                        second: requirement.origin.clone(),
                    }
                    .into());
                }
                Some(_) => {}
                None => {
                    debug!(origin = %requirement.origin, %selector, "candidate origin found");
                    candidate = Some(&requirement.origin);
                }
            }
        }

        match (candidate, selector) {
            (Some(origin), _) => Ok(Some(origin.clone())),
            (None, ArtifactSelector::Chart { repo_url, name, .. }) => {
                Err(ResolveError::chart_not_found(repo_url, name))
            }
            (None, _) => {
                debug!(%selector, "no requested origin subscribes to repository");
                Ok(None)
            }
        }
    }

    /// Subscriptions of the Warehouse a Requirement names
    pub(crate) async fn subscriptions_for(
        &self,
        requirement: &Requirement,
    ) -> Result<Vec<Subscription>, ResolveError> {
        let origin = &requirement.origin;
        let key = match origin.kind {
            OriginKind::Warehouse => WarehouseKey::new(self.project, origin.name.as_str()),
        };

        trace!(warehouse = %key, "looking up warehouse");
        self.directory
            .subscriptions(&key)
            .await
            .map_err(|err| ResolveError::lookup(origin, self.project, err))?
            .ok_or_else(|| ResolveError::warehouse_not_found(origin, self.project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::error::ErrorCategory;
    use async_trait::async_trait;
    use freightyard_core_interface::DirectoryError;
    use freightyard_core_manifest::Warehouse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PROJECT: &str = "demo";

    fn directory() -> InMemoryDirectory {
        crate::logging::init_test_logging();
        let directory = InMemoryDirectory::new();
        directory.insert(
            Warehouse::new(PROJECT, "a")
                .with_subscription(Subscription::git("https://example.com/repo.git"))
                .with_subscription(Subscription::image("docker.io/org/app"))
                .with_subscription(Subscription::chart("https://charts.example.com", "app")),
        );
        directory.insert(
            Warehouse::new(PROJECT, "b")
                .with_subscription(Subscription::git("https://example.com/other.git"))
                .with_subscription(Subscription::image("DOCKER.IO/org/app/"))
                .with_subscription(Subscription::chart("https://charts.example.com", "db")),
        );
        directory
    }

    fn reqs(names: &[&str]) -> Vec<Requirement> {
        names.iter().map(|name| Requirement::from_warehouse(*name)).collect()
    }

    #[tokio::test]
    async fn test_single_candidate_resolves() {
        let directory = directory();
        let requirements = reqs(&["a", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let origin = resolver
            .resolve_origin(None, &ArtifactSelector::commit("https://example.com/repo"))
            .await
            .unwrap();
        assert_eq!(origin, Some(Origin::warehouse("a")));
    }

    #[tokio::test]
    async fn test_overlapping_subscriptions_are_ambiguous() {
        let directory = directory();
        let requirements = reqs(&["a", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let err = resolver
            .resolve_origin(None, &ArtifactSelector::image("docker.io/org/app"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Ambiguity);
        match err {
            ResolveError::Ambiguous(ambiguity) => {
                assert_eq!(ambiguity.first, Origin::warehouse("a"));
                assert_eq!(ambiguity.second, Origin::warehouse("b"));
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_desired_origin_bypasses_lookups() {
        let directory = InMemoryDirectory::new();
        let requirements = reqs(&["missing"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);
        let desired = Origin::warehouse("b");

        let origin = resolver
            .resolve_origin(Some(&desired), &ArtifactSelector::image("docker.io/org/app"))
            .await
            .unwrap();
        assert_eq!(origin, Some(desired));
    }

    #[tokio::test]
    async fn test_no_candidate_is_absence_for_commits_and_images() {
        let directory = directory();
        let requirements = reqs(&["a", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let commit = resolver
            .resolve_origin(None, &ArtifactSelector::commit("https://example.com/unknown"))
            .await
            .unwrap();
        assert!(commit.is_none());

        let image = resolver
            .resolve_origin(None, &ArtifactSelector::image("quay.io/org/unknown"))
            .await
            .unwrap();
        assert!(image.is_none());
    }

    #[tokio::test]
    async fn test_no_candidate_is_error_for_charts() {
        let directory = directory();
        let requirements = reqs(&["a", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let err = resolver
            .resolve_origin(None, &ArtifactSelector::chart("https://charts.example.com", "cache"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("\"cache\""));
    }

    #[tokio::test]
    async fn test_chart_name_disambiguates_shared_repository() {
        let directory = directory();
        let requirements = reqs(&["a", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let origin = resolver
            .resolve_origin(None, &ArtifactSelector::chart("https://charts.example.com", "db"))
            .await
            .unwrap();
        assert_eq!(origin, Some(Origin::warehouse("b")));

        // An empty chart name matches both Warehouses
        let err = resolver
            .resolve_origin(None, &ArtifactSelector::chart("https://charts.example.com", ""))
            .await
            .unwrap_err();
        assert!(err.is_ambiguity());
    }

    #[tokio::test]
    async fn test_missing_warehouse_aborts() {
        let directory = directory();
        let requirements = reqs(&["a", "ghost", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let err = resolver
            .resolve_origin(None, &ArtifactSelector::commit("https://example.com/repo"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Warehouse \"ghost\" not found in namespace \"demo\"");
    }

    #[tokio::test]
    async fn test_repeated_origin_is_not_ambiguous() {
        let directory = directory();
        let requirements = reqs(&["a", "a"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let origin = resolver
            .resolve_origin(None, &ArtifactSelector::image("docker.io/org/app"))
            .await
            .unwrap();
        assert_eq!(origin, Some(Origin::warehouse("a")));
    }

    struct Unreachable {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WarehouseDirectory for Unreachable {
        async fn get(
            &self,
            _key: &WarehouseKey,
        ) -> freightyard_core_interface::Result<Option<Warehouse>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DirectoryError::Unavailable("api server down".into()))
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_aborts_immediately() {
        let directory = Unreachable {
            calls: AtomicUsize::new(0),
        };
        let requirements = reqs(&["a", "b"]);
        let resolver = Resolver::new(&directory, PROJECT, &requirements);

        let err = resolver
            .resolve_origin(None, &ArtifactSelector::commit("https://example.com/repo"))
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert!(err.to_string().contains("api server down"));
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
    }
}
