//! What a resolution is looking for

use freightyard_core_manifest::{
    normalize_repo_url, ArtifactKind, Chart, GitCommit, Image, Subscription,
};
use std::fmt;

/// A repository (and, for charts, a chart name) to resolve.
///
/// The repository URL is normalized once on construction; the URL as given
/// is kept for messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSelector {
    Commit {
        repo_url: String,
        normalized: String,
    },
    Image {
        repo_url: String,
        normalized: String,
    },
    /// An empty `name` matches any chart from the repository
    Chart {
        repo_url: String,
        normalized: String,
        name: String,
    },
}

impl ArtifactSelector {
    pub fn commit<S: Into<String>>(repo_url: S) -> Self {
        let repo_url = repo_url.into();
        ArtifactSelector::Commit {
            normalized: normalize_repo_url(&repo_url),
            repo_url,
        }
    }

    pub fn image<S: Into<String>>(repo_url: S) -> Self {
        let repo_url = repo_url.into();
        ArtifactSelector::Image {
            normalized: normalize_repo_url(&repo_url),
            repo_url,
        }
    }

    pub fn chart<S: Into<String>>(repo_url: S, name: S) -> Self {
        let repo_url = repo_url.into();
        ArtifactSelector::Chart {
            normalized: normalize_repo_url(&repo_url),
            repo_url,
            name: name.into(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactSelector::Commit { .. } => ArtifactKind::Commit,
            ArtifactSelector::Image { .. } => ArtifactKind::Image,
            ArtifactSelector::Chart { .. } => ArtifactKind::Chart,
        }
    }

    /// Repository URL as the caller spelled it
    pub fn repo_url(&self) -> &str {
        match self {
            ArtifactSelector::Commit { repo_url, .. }
            | ArtifactSelector::Image { repo_url, .. }
            | ArtifactSelector::Chart { repo_url, .. } => repo_url,
        }
    }

    pub fn normalized_repo_url(&self) -> &str {
        match self {
            ArtifactSelector::Commit { normalized, .. }
            | ArtifactSelector::Image { normalized, .. }
            | ArtifactSelector::Chart { normalized, .. } => normalized,
        }
    }

    fn same_repo(&self, repo_url: &str) -> bool {
        normalize_repo_url(repo_url) == self.normalized_repo_url()
    }

    fn same_chart(&self, chart_name: &str) -> bool {
        match self {
            ArtifactSelector::Chart { name, .. } => name.is_empty() || name == chart_name,
            _ => false,
        }
    }

    /// Whether a Warehouse subscription could produce the selected artifact
    pub fn matches_subscription(&self, subscription: &Subscription) -> bool {
        match (self, subscription) {
            (ArtifactSelector::Commit { .. }, Subscription::Git(sub)) => {
                self.same_repo(&sub.repo_url)
            }
            (ArtifactSelector::Image { .. }, Subscription::Image(sub)) => {
                self.same_repo(&sub.repo_url)
            }
            (ArtifactSelector::Chart { .. }, Subscription::Chart(sub)) => {
                self.same_repo(&sub.repo_url) && self.same_chart(&sub.name)
            }
            _ => false,
        }
    }

    pub fn matches_commit(&self, commit: &GitCommit) -> bool {
        matches!(self, ArtifactSelector::Commit { .. }) && self.same_repo(&commit.repo_url)
    }

    pub fn matches_image(&self, image: &Image) -> bool {
        matches!(self, ArtifactSelector::Image { .. }) && self.same_repo(&image.repo_url)
    }

    pub fn matches_chart(&self, chart: &Chart) -> bool {
        self.same_chart(&chart.name) && self.same_repo(&chart.repo_url)
    }
}

impl fmt::Display for ArtifactSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactSelector::Chart { name, .. } if !name.is_empty() => {
                write!(f, "chart {} from {}", name, self.repo_url())
            }
            _ => write!(f, "{} from {}", self.kind(), self.repo_url()),
        }
    }
}
