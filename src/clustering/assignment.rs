use tracing::{debug, trace};

use crate::article::Article;
use crate::clustering::similarity::{jaccard, ItemTokens};
use crate::clustering::types::{Cluster, Scoring};
use crate::clustering::util::renumber;
use crate::entity::TokenInfo;
use crate::TARGET_CLUSTER;

/// Single-pass greedy grouping.
///
/// Each article joins the first existing cluster scoring at or above
/// `threshold`, otherwise it founds a new one. Earlier clusters win ties, so
/// the result depends on input order.
///
/// # Arguments
/// * `articles` - Articles in discovery order
/// * `infos` - Extracted token info, parallel to `articles`
/// * `threshold` - Minimum score to join a cluster; not range-checked
/// * `scoring` - Scoring policy applied to the whole run
///
/// # Returns
/// * `Vec<Cluster>` - Clusters in founding order, ids renumbered
pub fn build_clusters(
    articles: &[Article],
    infos: &[TokenInfo],
    threshold: f64,
    scoring: Scoring,
) -> Vec<Cluster> {
    let item_tokens: Vec<ItemTokens> = match scoring {
        Scoring::Weighted => articles.iter().map(ItemTokens::from_article).collect(),
        Scoring::Representative => Vec::new(),
    };

    let mut clusters: Vec<Cluster> = Vec::new();
    // Index of each cluster's founding article, parallel to `clusters`
    let mut founders: Vec<usize> = Vec::new();

    for (i, (article, info)) in articles.iter().zip(infos).enumerate() {
        let target = (0..clusters.len()).find(|&c| {
            let score = match scoring {
                Scoring::Representative => jaccard(&info.tokens, &clusters[c].rep),
                Scoring::Weighted => item_tokens[i].similarity(&item_tokens[founders[c]]),
            };
            score >= threshold
        });

        match target {
            Some(c) => {
                trace!(target: TARGET_CLUSTER, "Article {} joins cluster {}", article.id, c);
                clusters[c].push(article.clone(), info.tokens.clone());
            }
            None => {
                trace!(target: TARGET_CLUSTER, "Article {} founds cluster {}", article.id, clusters.len());
                clusters.push(Cluster::new(article.clone(), info.clone()));
                founders.push(i);
            }
        }
    }

    renumber(&mut clusters);

    debug!(
        target: TARGET_CLUSTER,
        "Greedy pass - articles={}, clusters={}, threshold={}, scoring={}",
        articles.len(),
        clusters.len(),
        threshold,
        scoring
    );

    clusters
}
