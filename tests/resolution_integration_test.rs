/*!
 * Integration tests for Freight origin resolution
 *
 * Drives the resolver end to end from catalog and promotion documents on
 * disk, the same way the `freightyard` command does.
 */

use freightyard::{
    directory::{CatalogDirectory, InMemoryDirectory},
    error::{ErrorCategory, EXIT_CONFIG},
    resolve::Resolver,
    Origin, PromotionDocument, ResolveError,
};
use freightyard_core_manifest::{
    Catalog, Chart, FreightReference, GitCommit, Image, Requirement, Subscription, Warehouse,
};
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "schema": "freightyard.catalog.v1",
  "default_namespace": "demo",
  "warehouses": [
    {
      "name": "a",
      "subscriptions": [
        { "git": { "repoURL": "https://example.com/repo.git" } },
        { "image": { "repoURL": "docker.io/org/app" } },
        { "chart": { "repoURL": "oci://ghcr.io/org/charts", "name": "app" } }
      ]
    },
    {
      "name": "b",
      "subscriptions": [
        { "git": { "repoURL": "https://example.com/other.git" } },
        { "image": { "repoURL": "https://docker.io/org/app/" } }
      ]
    },
    {
      "name": "c",
      "subscriptions": [
        { "image": { "repoURL": "ghcr.io/org/worker" } }
      ]
    }
  ]
}"#;

const PROMOTION: &str = r#"{
  "schema": "freightyard.promotion.v1",
  "project": "demo",
  "stage": "prod",
  "requirements": [
    { "origin": { "kind": "Warehouse", "name": "a" } },
    { "origin": { "kind": "Warehouse", "name": "b" } }
  ],
  "freight": [
    {
      "name": "f-a",
      "origin": { "kind": "Warehouse", "name": "a" },
      "commits": [ { "repoURL": "https://example.com/repo", "id": "abc" } ],
      "images": [ { "repoURL": "docker.io/org/app", "tag": "1.0.0" } ],
      "charts": [ { "repoURL": "oci://ghcr.io/org/charts", "name": "app", "version": "2.1.0" } ]
    }
  ]
}"#;

struct Fixture {
    _dir: TempDir,
    catalog: PathBuf,
    promotion: PathBuf,
}

impl Fixture {
    fn new(catalog: &str, promotion: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        let promotion_path = dir.path().join("promotion.json");
        std::fs::write(&catalog_path, catalog).unwrap();
        std::fs::write(&promotion_path, promotion).unwrap();
        Self {
            _dir: dir,
            catalog: catalog_path,
            promotion: promotion_path,
        }
    }

    fn open(&self) -> (CatalogDirectory, PromotionDocument) {
        let directory = CatalogDirectory::load(&self.catalog, "demo").unwrap();
        let promotion = PromotionDocument::load(&self.promotion).unwrap();
        (directory, promotion)
    }
}

#[tokio::test]
async fn test_commit_resolves_through_git_suffix() {
    let fixture = Fixture::new(CATALOG, PROMOTION);
    let (directory, promotion) = fixture.open();
    let resolver = Resolver::new(&directory, "demo", &promotion.requirements);

    let commit = resolver
        .find_commit(None, &promotion.freight, "https://example.com/repo")
        .await
        .unwrap()
        .expect("commit from origin a");
    assert_eq!(commit.id, "abc");
}

#[tokio::test]
async fn test_image_overlap_is_ambiguous() {
    let fixture = Fixture::new(CATALOG, PROMOTION);
    let (directory, promotion) = fixture.open();
    let resolver = Resolver::new(&directory, "demo", &promotion.requirements);

    let err = resolver
        .find_image(None, &promotion.freight, "docker.io/org/app")
        .await
        .unwrap_err();
    assert!(err.is_ambiguity());
    assert_eq!(err.category(), ErrorCategory::Ambiguity);
    assert_eq!(err.exit_code(), EXIT_CONFIG);
    assert!(err.to_string().contains("Warehouse/a"));
    assert!(err.to_string().contains("Warehouse/b"));

    let ambiguity = resolver
        .check_ambiguous_image_requests()
        .await
        .unwrap()
        .expect("images from a and b overlap");
    assert_eq!(ambiguity.first, Origin::warehouse("a"));
    assert_eq!(ambiguity.second, Origin::warehouse("b"));
    assert!(resolver.ensure_unambiguous_image_requests().await.is_err());
}

#[tokio::test]
async fn test_explicit_origin_bypasses_ambiguity() {
    let fixture = Fixture::new(CATALOG, PROMOTION);
    let (directory, promotion) = fixture.open();
    let resolver = Resolver::new(&directory, "demo", &promotion.requirements);

    let image = resolver
        .find_image(
            Some(&Origin::warehouse("a")),
            &promotion.freight,
            "docker.io/org/app",
        )
        .await
        .unwrap()
        .expect("image from origin a");
    assert_eq!(image.tag, "1.0.0");

    let absent = resolver
        .find_image(
            Some(&Origin::warehouse("b")),
            &promotion.freight,
            "docker.io/org/app",
        )
        .await
        .unwrap();
    assert!(absent.is_none());
}

#[tokio::test]
async fn test_chart_resolution_and_not_found() {
    let fixture = Fixture::new(CATALOG, PROMOTION);
    let (directory, promotion) = fixture.open();
    let resolver = Resolver::new(&directory, "demo", &promotion.requirements);

    let chart = resolver
        .find_chart(None, &promotion.freight, "oci://ghcr.io/org/charts", "app")
        .await
        .unwrap()
        .expect("chart from origin a");
    assert_eq!(chart.version, "2.1.0");

    let err = resolver
        .find_chart(None, &promotion.freight, "https://charts.example.com", "")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.exit_code(), EXIT_CONFIG);
    let message = err.to_string();
    assert!(message.contains("https://charts.example.com"));
    assert!(!message.contains("\"\""));
}

#[tokio::test]
async fn test_unsubscribed_repo_is_absent_for_commits_and_images() {
    let fixture = Fixture::new(CATALOG, PROMOTION);
    let (directory, promotion) = fixture.open();
    let resolver = Resolver::new(&directory, "demo", &promotion.requirements);

    assert!(resolver
        .find_commit(None, &promotion.freight, "https://example.com/unknown")
        .await
        .unwrap()
        .is_none());
    // Warehouse c subscribes but is not a requirement
    assert!(resolver
        .find_image(None, &promotion.freight, "ghcr.io/org/worker")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_missing_warehouse_is_configuration_error() {
    let promotion = PROMOTION.replace(r#""name": "b" } }"#, r#""name": "gone" } }"#);
    let fixture = Fixture::new(CATALOG, &promotion);
    let (directory, promotion) = fixture.open();
    let resolver = Resolver::new(&directory, "demo", &promotion.requirements);

    let err = resolver
        .find_commit(None, &promotion.freight, "https://example.com/nothing")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::WarehouseNotFound { ref warehouse, .. } if warehouse == "gone"
    ));
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[tokio::test]
async fn test_origin_without_freight_yet_is_absent() {
    let directory: InMemoryDirectory = [
        Warehouse::new("demo", "a").with_subscription(Subscription::git("https://x/y")),
        Warehouse::new("demo", "b").with_subscription(Subscription::git("https://x/z")),
    ]
    .into_iter()
    .collect();
    let requirements = vec![
        Requirement::from_warehouse("a"),
        Requirement::from_warehouse("b"),
    ];
    let freight = vec![FreightReference::new(Origin::warehouse("a"))
        .with_commit(GitCommit::new("https://x/y", "abc"))
        .with_image(Image::new("docker.io/org/app", "1.0.0"))
        .with_chart(Chart::new("oci://ghcr.io/org/charts", "app", "1.0.0"))];
    let resolver = Resolver::new(&directory, "demo", &requirements);

    let found = resolver
        .find_commit(None, &freight, "https://x/y")
        .await
        .unwrap();
    assert_eq!(found.map(|c| c.id.as_str()), Some("abc"));

    let pending = resolver
        .find_commit(None, &freight, "https://x/z")
        .await
        .unwrap();
    assert!(pending.is_none());
}

#[test]
fn test_catalog_round_trip_feeds_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.toml");
    let mut catalog = Catalog::new().with_default_namespace("demo");
    catalog.add_warehouse(
        Warehouse::new("", "a").with_subscription(Subscription::image("docker.io/org/app")),
    );
    catalog.save(&path).unwrap();

    let directory = CatalogDirectory::load(&path, "fallback").unwrap();
    assert_eq!(directory.len(), 1);
    assert_eq!(directory.source(), Some(path.as_path()));
}
