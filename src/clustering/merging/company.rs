use tracing::info;

use crate::clustering::merging::core::merge_singleton_buckets;
use crate::clustering::types::Cluster;
use crate::clustering::util::renumber;
use crate::TARGET_CLUSTER;

/// Regroups singleton clusters by their company.
///
/// Runs only on explicit request. Every singleton carrying a company joins the
/// first singleton with the same company; multi-item clusters keep their
/// members even when they have a company. Ids are renumbered afterwards.
///
/// # Returns
/// * `usize` - Number of clusters absorbed
pub fn regroup_by_company(clusters: &mut Vec<Cluster>) -> usize {
    let before = clusters.len();
    let absorbed = merge_singleton_buckets(clusters, |c| c.company.clone());
    renumber(clusters);
    info!(
        target: TARGET_CLUSTER,
        "Company regrouping - clusters {} -> {}",
        before,
        clusters.len()
    );
    absorbed
}
