use std::collections::HashMap;
use tracing::debug;

use crate::clustering::types::Cluster;
use crate::TARGET_CLUSTER;

/// Collapses singleton clusters that share a bucket key.
///
/// The first singleton seen for a key becomes the target; later singletons
/// with the same key are absorbed into it. Multi-item clusters and singletons
/// without a key pass through untouched, and list order is preserved apart
/// from the removed clusters. Ids are not renumbered here.
///
/// # Arguments
/// * `clusters` - Clusters to merge in place
/// * `key` - Bucket key for a singleton, `None` to leave it alone
///
/// # Returns
/// * `usize` - Number of clusters absorbed
pub fn merge_singleton_buckets<F>(clusters: &mut Vec<Cluster>, key: F) -> usize
where
    F: Fn(&Cluster) -> Option<String>,
{
    let mut merged: Vec<Cluster> = Vec::with_capacity(clusters.len());
    let mut buckets: HashMap<String, usize> = HashMap::new();
    let mut absorbed = 0;

    for cluster in clusters.drain(..) {
        let bucket = if cluster.is_singleton() {
            key(&cluster)
        } else {
            None
        };

        match bucket {
            Some(k) => match buckets.get(&k) {
                Some(&target) => {
                    debug!(
                        target: TARGET_CLUSTER,
                        "Bucket '{}' absorbs article {}", k, cluster.items[0].id
                    );
                    merged[target].absorb(cluster);
                    absorbed += 1;
                }
                None => {
                    buckets.insert(k, merged.len());
                    merged.push(cluster);
                }
            },
            None => merged.push(cluster),
        }
    }

    *clusters = merged;
    absorbed
}
