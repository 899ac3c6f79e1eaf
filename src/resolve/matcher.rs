//! Artifact lookup within the associated Freight pool
//!
//! Once an Origin is known, the artifact is the first one, in pool order, that
//! sits in a FreightReference from that Origin and matches the selector.
//! Finding nothing is normal: the Origin may not have contributed Freight to
//! the promotion yet.

use super::selector::ArtifactSelector;
use freightyard_core_manifest::{Chart, FreightReference, GitCommit, Image, Origin};

fn first_match<'f, T: 'f>(
    origin: &Origin,
    freight: &'f [FreightReference],
    artifacts: impl Fn(&'f FreightReference) -> &'f [T],
    matches: impl Fn(&T) -> bool,
) -> Option<&'f T> {
    freight
        .iter()
        .filter(|f| f.origin == *origin)
        .flat_map(artifacts)
        .find(|artifact| matches(*artifact))
}

/// First commit from `origin` whose repository matches the selector
pub fn match_commit<'f>(
    origin: &Origin,
    freight: &'f [FreightReference],
    selector: &ArtifactSelector,
) -> Option<&'f GitCommit> {
    first_match(origin, freight, |f| f.commits.as_slice(), |c| selector.matches_commit(c))
}

/// First image from `origin` whose repository matches the selector
pub fn match_image<'f>(
    origin: &Origin,
    freight: &'f [FreightReference],
    selector: &ArtifactSelector,
) -> Option<&'f Image> {
    first_match(origin, freight, |f| f.images.as_slice(), |i| selector.matches_image(i))
}

/// First chart from `origin` whose repository and name match the selector
pub fn match_chart<'f>(
    origin: &Origin,
    freight: &'f [FreightReference],
    selector: &ArtifactSelector,
) -> Option<&'f Chart> {
    first_match(origin, freight, |f| f.charts.as_slice(), |c| selector.matches_chart(c))
}

/// The FreightReference the matching artifact is taken from
pub fn match_freight<'f>(
    origin: &Origin,
    freight: &'f [FreightReference],
    selector: &ArtifactSelector,
) -> Option<&'f FreightReference> {
    freight
        .iter()
        .filter(|f| f.origin == *origin)
        .find(|f| match selector {
            ArtifactSelector::Commit { .. } => {
                f.commits.iter().any(|c| selector.matches_commit(c))
            }
            ArtifactSelector::Image { .. } => f.images.iter().any(|i| selector.matches_image(i)),
            ArtifactSelector::Chart { .. } => f.charts.iter().any(|c| selector.matches_chart(c)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<FreightReference> {
        vec![
            FreightReference::new(Origin::warehouse("b"))
                .with_commit(GitCommit::new("https://x/y", "from-b")),
            FreightReference::new(Origin::warehouse("a"))
                .with_commit(GitCommit::new("https://x/other", "other"))
                .with_commit(GitCommit::new("https://x/y", "abc"))
                .with_image(Image::new("docker.io/org/app", "1.2.3").with_digest("sha256:feed")),
            FreightReference::new(Origin::warehouse("a"))
                .with_commit(GitCommit::new("https://x/y.git", "later"))
                .with_chart(Chart::new("https://charts.example.com", "app", "0.4.0"))
                .with_chart(Chart::new("https://charts.example.com", "db", "1.0.0")),
        ]
    }

    #[test]
    fn test_commit_from_matching_origin_only() {
        let pool = pool();
        let selector = ArtifactSelector::commit("https://x/y");
        let commit = match_commit(&Origin::warehouse("a"), &pool, &selector);
        assert_eq!(commit.map(|c| c.id.as_str()), Some("abc"));

        let commit = match_commit(&Origin::warehouse("b"), &pool, &selector);
        assert_eq!(commit.map(|c| c.id.as_str()), Some("from-b"));
    }

    #[test]
    fn test_absent_origin_yields_none() {
        let pool = pool();
        let selector = ArtifactSelector::commit("https://x/y");
        assert!(match_commit(&Origin::warehouse("c"), &pool, &selector).is_none());
        assert!(match_commit(&Origin::warehouse("a"), &[], &selector).is_none());
    }

    #[test]
    fn test_image_match_returns_pool_entry() {
        let pool = pool();
        let image = match_image(
            &Origin::warehouse("a"),
            &pool,
            &ArtifactSelector::image("https://docker.io/org/app/"),
        )
        .unwrap();
        assert_eq!(image.tag, "1.2.3");
        assert!(std::ptr::eq(image, &pool[1].images[0]));
    }

    #[test]
    fn test_chart_match_by_name() {
        let pool = pool();
        let origin = Origin::warehouse("a");

        let chart = |name| ArtifactSelector::chart("https://charts.example.com", name);

        let db = match_chart(&origin, &pool, &chart("db"));
        assert_eq!(db.map(|c| c.version.as_str()), Some("1.0.0"));

        let any = match_chart(&origin, &pool, &chart(""));
        assert_eq!(any.map(|c| c.name.as_str()), Some("app"));

        let missing = match_chart(&origin, &pool, &chart("cache"));
        assert!(missing.is_none());
    }

    #[test]
    fn test_match_freight_holds_the_matched_artifact() {
        let pool = pool();
        let origin = Origin::warehouse("a");
        let selector = ArtifactSelector::chart("https://charts.example.com", "db");

        let source = match_freight(&origin, &pool, &selector).unwrap();
        assert!(std::ptr::eq(source, &pool[2]));
        let chart = match_chart(&origin, &pool, &selector).unwrap();
        assert!(std::ptr::eq(chart, &source.charts[1]));

        let selector = ArtifactSelector::commit("https://x/y");
        let source = match_freight(&origin, &pool, &selector).unwrap();
        assert!(std::ptr::eq(source, &pool[1]));
        assert!(match_freight(&Origin::warehouse("c"), &pool, &selector).is_none());
    }
}
