//! Warehouses and their subscriptions

use crate::repo_url::normalize_repo_url;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of artifact a subscription produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Commit,
    Image,
    Chart,
}

impl ArtifactKind {
    /// Phrase used in user-facing messages ("a container image from ...")
    pub fn describe(&self) -> &'static str {
        match self {
            ArtifactKind::Commit => "commit",
            ArtifactKind::Image => "container image",
            ArtifactKind::Chart => "chart",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactKind::Commit => "commit",
            ArtifactKind::Image => "image",
            ArtifactKind::Chart => "chart",
        };
        f.write_str(s)
    }
}

/// Subscription to a git repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSubscription {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Subscription to a container image repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSubscription {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver_constraint: Option<String>,
}

/// Subscription to a Helm chart repository.
///
/// `name` is empty for OCI repositories where the chart is the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSubscription {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semver_constraint: Option<String>,
}

/// One upstream a Warehouse tracks. Exactly one variant per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    Git(GitSubscription),
    Image(ImageSubscription),
    Chart(ChartSubscription),
}

impl Subscription {
    pub fn git<S: Into<String>>(repo_url: S) -> Self {
        Subscription::Git(GitSubscription {
            repo_url: repo_url.into(),
            branch: None,
        })
    }

    pub fn image<S: Into<String>>(repo_url: S) -> Self {
        Subscription::Image(ImageSubscription {
            repo_url: repo_url.into(),
            semver_constraint: None,
        })
    }

    pub fn chart<S: Into<String>>(repo_url: S, name: S) -> Self {
        Subscription::Chart(ChartSubscription {
            repo_url: repo_url.into(),
            name: name.into(),
            semver_constraint: None,
        })
    }

    /// Repository URL as declared
    pub fn repo_url(&self) -> &str {
        match self {
            Subscription::Git(sub) => &sub.repo_url,
            Subscription::Image(sub) => &sub.repo_url,
            Subscription::Chart(sub) => &sub.repo_url,
        }
    }

    pub fn normalized_repo_url(&self) -> String {
        normalize_repo_url(self.repo_url())
    }

    pub fn artifact_kind(&self) -> ArtifactKind {
        match self {
            Subscription::Git(_) => ArtifactKind::Commit,
            Subscription::Image(_) => ArtifactKind::Image,
            Subscription::Chart(_) => ArtifactKind::Chart,
        }
    }
}

/// A declared set of upstream subscriptions that produces Freight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// Project namespace; filled in from the catalog default when omitted
    #[serde(default)]
    pub namespace: String,

    pub name: String,

    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl Warehouse {
    pub fn new<S: Into<String>>(namespace: S, name: S) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            subscriptions: Vec::new(),
        }
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    /// Image subscriptions in declaration order
    pub fn image_subscriptions(&self) -> impl Iterator<Item = &ImageSubscription> {
        self.subscriptions.iter().filter_map(|sub| match sub {
            Subscription::Image(image) => Some(image),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_tagging() {
        let json = r#"{"git":{"repoURL":"https://example.com/repo.git"}}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub, Subscription::git("https://example.com/repo.git"));
        assert_eq!(sub.artifact_kind(), ArtifactKind::Commit);
        assert_eq!(sub.normalized_repo_url(), "example.com/repo");
    }

    #[test]
    fn test_chart_subscription_name_defaults_empty() {
        let json = r#"{"chart":{"repoURL":"oci://ghcr.io/org/app"}}"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        match sub {
            Subscription::Chart(chart) => assert!(chart.name.is_empty()),
            other => panic!("expected chart subscription, got {other:?}"),
        }
    }

    #[test]
    fn test_subscription_rejects_unknown_variant() {
        let json = r#"{"bucket":{"repoURL":"s3://b"}}"#;
        assert!(serde_json::from_str::<Subscription>(json).is_err());
    }

    #[test]
    fn test_image_subscriptions_filter() {
        let warehouse = Warehouse::new("proj", "wh")
            .with_subscription(Subscription::git("https://example.com/a"))
            .with_subscription(Subscription::image("docker.io/org/app"))
            .with_subscription(Subscription::chart("https://charts.example.com", "app"));
        let images: Vec<_> = warehouse.image_subscriptions().collect();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].repo_url, "docker.io/org/app");
    }

    #[test]
    fn test_artifact_kind_describe() {
        assert_eq!(ArtifactKind::Image.describe(), "container image");
        assert_eq!(ArtifactKind::Image.to_string(), "image");
    }
}
