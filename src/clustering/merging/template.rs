use tracing::debug;

use crate::clustering::merging::core::merge_singleton_buckets;
use crate::clustering::types::Cluster;
use crate::TARGET_CLUSTER;

/// Merges singleton clusters that share a template id.
///
/// Template-generated titles always co-cluster, even when their word overlap
/// falls under the similarity threshold. Larger clusters are left to the
/// threshold pass.
///
/// # Returns
/// * `usize` - Number of clusters absorbed
pub fn merge_template_buckets(clusters: &mut Vec<Cluster>) -> usize {
    let absorbed = merge_singleton_buckets(clusters, |c| c.template_id.clone());
    debug!(
        target: TARGET_CLUSTER,
        "Template bucket pass - absorbed={}, clusters={}",
        absorbed,
        clusters.len()
    );
    absorbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::entity::EntityExtractor;

    fn singleton(id: &str, title: &str) -> Cluster {
        Cluster::new(Article::new(id, title), EntityExtractor::new().extract(title))
    }

    #[test]
    fn test_template_singletons_collapse_across_companies() {
        let mut clusters = vec![
            singleton("1", "NVIDIA announces breakthrough in vision technology"),
            singleton("2", "Rates stay flat"),
            singleton("3", "Google announces breakthrough in computer vision technology"),
        ];
        assert_eq!(merge_template_buckets(&mut clusters), 1);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        // founding metadata wins
        assert_eq!(clusters[0].company.as_deref(), Some("nvidia"));
    }

    #[test]
    fn test_no_template_no_merge() {
        let mut clusters = vec![singleton("1", "Apple earnings"), singleton("2", "Apple earnings")];
        assert_eq!(merge_template_buckets(&mut clusters), 0);
        assert_eq!(clusters.len(), 2);
    }
}
