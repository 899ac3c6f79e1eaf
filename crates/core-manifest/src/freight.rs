//! Freight references and the artifacts they carry
//!
//! A [`FreightReference`] is an immutable bundle of artifacts tagged with the
//! [`Origin`] that produced it. Version fields (SHA, tag, digest, chart version)
//! are carried but never interpreted during origin resolution.

use crate::origin::Origin;
use crate::repo_url::normalize_repo_url;
use serde::{Deserialize, Serialize};

/// A specific commit from a git repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommit {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    /// Commit SHA
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GitCommit {
    pub fn new<S: Into<String>>(repo_url: S, id: S) -> Self {
        Self {
            repo_url: repo_url.into(),
            id: id.into(),
            branch: None,
            tag: None,
            message: None,
        }
    }
}

/// A specific container image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl Image {
    pub fn new<S: Into<String>>(repo_url: S, tag: S) -> Self {
        Self {
            repo_url: repo_url.into(),
            tag: tag.into(),
            digest: None,
        }
    }

    pub fn with_digest<S: Into<String>>(mut self, digest: S) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

/// A specific Helm chart version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    #[serde(rename = "repoURL")]
    pub repo_url: String,

    #[serde(default)]
    pub name: String,

    pub version: String,
}

impl Chart {
    pub fn new<S: Into<String>>(repo_url: S, name: S, version: S) -> Self {
        Self {
            repo_url: repo_url.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// A materialized bundle of artifacts from a single Origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreightReference {
    /// Freight identifier; see [`FreightReference::content_id`]
    #[serde(default)]
    pub name: String,

    pub origin: Origin,

    #[serde(default)]
    pub commits: Vec<GitCommit>,

    #[serde(default)]
    pub images: Vec<Image>,

    #[serde(default)]
    pub charts: Vec<Chart>,
}

impl FreightReference {
    pub fn new(origin: Origin) -> Self {
        Self {
            name: String::new(),
            origin,
            commits: Vec::new(),
            images: Vec::new(),
            charts: Vec::new(),
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_commit(mut self, commit: GitCommit) -> Self {
        self.commits.push(commit);
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_chart(mut self, chart: Chart) -> Self {
        self.charts.push(chart);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.images.is_empty() && self.charts.is_empty()
    }

    /// Stable BLAKE3 digest of the artifacts, independent of their order.
    ///
    /// Repository URLs are normalized first, so the same artifacts spelled
    /// differently produce the same ID.
    pub fn content_id(&self) -> String {
        let mut artifacts: Vec<String> = Vec::with_capacity(
            self.commits.len() + self.images.len() + self.charts.len(),
        );
        for commit in &self.commits {
            artifacts.push(format!(
                "commit:{}:{}",
                normalize_repo_url(&commit.repo_url),
                commit.id
            ));
        }
        for image in &self.images {
            let version = image.digest.as_deref().unwrap_or(&image.tag);
            artifacts.push(format!("image:{}:{}", normalize_repo_url(&image.repo_url), version));
        }
        for chart in &self.charts {
            artifacts.push(format!(
                "chart:{}:{}:{}",
                normalize_repo_url(&chart.repo_url),
                chart.name,
                chart.version
            ));
        }
        artifacts.sort();

        let mut hasher = blake3::Hasher::new();
        hasher.update(self.origin.to_string().as_bytes());
        for artifact in &artifacts {
            hasher.update(b"\n");
            hasher.update(artifact.as_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}
