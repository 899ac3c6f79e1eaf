//! Up-front ambiguity check for image subscriptions
//!
//! Runs before any particular image is resolved, so a promotion whose
//! Requirements overlap on an image repository fails early. Git and chart
//! overlaps are only detected when those artifacts are resolved.

use super::Resolver;
use crate::error::{Ambiguity, ResolveError};
use freightyard_core_interface::WarehouseDirectory;
use freightyard_core_manifest::{normalize_repo_url, ArtifactKind, Origin, Subscription};
use std::collections::HashMap;
use tracing::debug;

impl<'a, D: WarehouseDirectory + ?Sized> Resolver<'a, D> {
    /// Find the first image repository two different Origins both subscribe to.
    ///
    /// `Ok(Some(_))` describes the overlap; `Ok(None)` means every image
    /// repository has at most one candidate Origin. A repeated Origin is a
    /// single candidate.
    pub async fn check_ambiguous_image_requests(&self) -> Result<Option<Ambiguity>, ResolveError> {
        let mut subscribed: HashMap<String, &Origin> = HashMap::new();

        for requirement in self.requirements {
            let subscriptions = self.subscriptions_for(requirement).await?;
            for sub in &subscriptions {
                let Subscription::Image(image) = sub else {
                    continue;
                };
                let repo = normalize_repo_url(&image.repo_url);
                match subscribed.get(&repo) {
                    Some(first) if **first != requirement.origin => {
                        debug!(
                            repo = %image.repo_url,
                            first = %first,
                            second = %requirement.origin,
                            "ambiguous image request"
                        );
                        return Ok(Some(Ambiguity {
                            kind: ArtifactKind::Image,
                            repo_url: image.repo_url.clone(),
                            first: (*first).clone(),
                            second: requirement.origin.clone(),
                        }));
                    }
                    Some(_) => {}
                    None => {
                        subscribed.insert(repo, &requirement.origin);
                    }
                }
            }
        }

        Ok(None)
    }

    /// Promotion gate: fail with `ResolveError::Ambiguous` on any image overlap
    pub async fn ensure_unambiguous_image_requests(&self) -> Result<(), ResolveError> {
        match self.check_ambiguous_image_requests().await? {
            Some(ambiguity) => Err(ambiguity.into()),
            None => Ok(()),
        }
    }
}
