use std::time::Instant;
use tracing::info;

use crate::article::Article;
use crate::clustering::assignment::build_clusters;
use crate::clustering::merging::{merge_similar_titles, merge_template_buckets};
use crate::clustering::summary::fill_all_heuristic_content;
use crate::clustering::types::{Cluster, ClusterParams};
use crate::clustering::util::renumber;
use crate::clustering::TITLE_MERGE_THRESHOLD;
use crate::entity::{EntityExtractor, TokenInfo};
use crate::TARGET_CLUSTER;

/// Clusters articles with the built-in company list plus
/// `params.extra_companies`.
pub fn cluster_articles(articles: &[Article], params: &ClusterParams) -> Vec<Cluster> {
    let extractor = EntityExtractor::new().with_extra_companies(&params.extra_companies);
    cluster_articles_with(&extractor, articles, params)
}

/// Runs a full clustering pass with a caller-supplied extractor.
/// `params.extra_companies` is not consulted here.
///
/// This function:
/// 1. Extracts tokens, template id and company from every title
/// 2. Groups articles greedily against the running clusters
/// 3. Collapses template singletons into one cluster per template
/// 4. Optionally merges clusters with near-identical first titles
/// 5. Renumbers ids and optionally fills heuristic content
///
/// Every article ends up in exactly one cluster. Empty input returns an
/// empty list. Company regrouping is a separate, explicit step.
pub fn cluster_articles_with(
    extractor: &EntityExtractor,
    articles: &[Article],
    params: &ClusterParams,
) -> Vec<Cluster> {
    if articles.is_empty() {
        return Vec::new();
    }

    let start_time = Instant::now();

    let infos: Vec<TokenInfo> = articles.iter().map(|a| extractor.extract(&a.title)).collect();
    let mut clusters = build_clusters(articles, &infos, params.threshold, params.scoring);
    let greedy_count = clusters.len();

    let template_merges = merge_template_buckets(&mut clusters);
    let title_merges = if params.title_merge {
        merge_similar_titles(&mut clusters, TITLE_MERGE_THRESHOLD)
    } else {
        0
    };
    renumber(&mut clusters);

    fill_all_heuristic_content(&mut clusters, params);

    info!(
        target: TARGET_CLUSTER,
        "Clustered {} articles into {} clusters (greedy={}, template merges={}, title merges={}) in {:.2?}",
        articles.len(),
        clusters.len(),
        greedy_count,
        template_merges,
        title_merges,
        start_time.elapsed()
    );

    clusters
}
