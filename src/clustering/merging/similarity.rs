use tracing::debug;

use crate::clustering::similarity::title_similarity;
use crate::clustering::types::Cluster;
use crate::TARGET_CLUSTER;

/// Merges whole clusters whose first titles are near-identical.
///
/// Scans pairs `(i, j)` with `i < j`; when the bigram similarity of the two
/// first titles exceeds `threshold`, `j` is absorbed into `i` and the scan
/// restarts from the top. Each merge removes a cluster, so the loop ends.
/// Ids are not renumbered here.
///
/// # Arguments
/// * `clusters` - Clusters to merge in place
/// * `threshold` - Strict lower bound on title similarity
///
/// # Returns
/// * `usize` - Number of merges performed
pub fn merge_similar_titles(clusters: &mut Vec<Cluster>, threshold: f64) -> usize {
    let mut merges = 0;

    'scan: loop {
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let score = title_similarity(clusters[i].first_title(), clusters[j].first_title());
                if score > threshold {
                    debug!(
                        target: TARGET_CLUSTER,
                        "Title pass merges cluster {} into {} (score={:.3})", j, i, score
                    );
                    let source = clusters.remove(j);
                    clusters[i].absorb(source);
                    merges += 1;
                    continue 'scan;
                }
            }
        }
        break;
    }

    merges
}
