use anyhow::Result;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{info, warn};

use super::schema::parse_enrichment;
use super::{CompletionService, Enrichment};
use crate::clustering::Cluster;
use crate::prompts::enrichment_prompt;
use crate::TARGET_LLM_REQUEST;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub enriched: usize,
    pub failed: usize,
    pub skipped: usize,
    pub warnings: usize,
}

/// Enriches clusters through `service` with at most `concurrency` requests in
/// flight.
///
/// Clusters already marked `enhanced` are skipped. A failure on one cluster is
/// recorded in its `enrichment_error` and does not affect the others. Results
/// are applied once every request has finished, and only enrichment fields
/// are written; membership is never touched.
pub async fn enrich_clusters<C: CompletionService>(
    clusters: &mut [Cluster],
    service: &C,
    concurrency: usize,
) -> EnrichmentStats {
    let start_time = Instant::now();
    let mut stats = EnrichmentStats::default();

    let jobs: Vec<(usize, String)> = clusters
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.enhanced)
        .map(|(i, c)| (i, enrichment_prompt(c)))
        .collect();
    stats.skipped = clusters.len() - jobs.len();

    let outcomes: Vec<(usize, Result<(Enrichment, Vec<String>)>)> = stream::iter(jobs)
        .map(|(i, prompt)| async move {
            let outcome = match service.complete(&prompt).await {
                Ok(response) => parse_enrichment(&response),
                Err(e) => Err(e),
            };
            (i, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    for (i, outcome) in outcomes {
        let cluster = &mut clusters[i];
        match outcome {
            Ok((enrichment, warnings)) => {
                if !warnings.is_empty() {
                    warn!(
                        target: TARGET_LLM_REQUEST,
                        "Cluster {} enrichment warnings: {}",
                        cluster.id,
                        warnings.join(", ")
                    );
                }
                stats.enriched += 1;
                stats.warnings += warnings.len();
                cluster.enrichment = Some(enrichment);
                cluster.enrichment_warnings = warnings;
                cluster.enrichment_error = None;
                cluster.enhanced = true;
            }
            Err(e) => {
                warn!(target: TARGET_LLM_REQUEST, "Cluster {} enrichment failed: {}", cluster.id, e);
                stats.failed += 1;
                cluster.enrichment_error = Some(e.to_string());
            }
        }
    }

    info!(
        target: TARGET_LLM_REQUEST,
        "Enrichment finished in {:.2?} - enriched={}, failed={}, skipped={}, warnings={}",
        start_time.elapsed(),
        stats.enriched,
        stats.failed,
        stats.skipped,
        stats.warnings
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::clustering::{cluster_articles, ClusterParams};
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers by keyword in the prompt and tracks peak concurrency.
    struct StubService {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl StubService {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    impl CompletionService for StubService {
        async fn complete(&self, prompt: &str) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if prompt.contains("Outage") {
                Err(anyhow!("connection reset"))
            } else if prompt.contains("Garbled") {
                Ok("I cannot help with that".to_string())
            } else if prompt.contains("Partial") {
                Ok(r#"{"topicZh": "部分", "mood": "odd"}"#.to_string())
            } else {
                Ok(r#"{"topicZh": "话题", "summaryZh": "摘要"}"#.to_string())
            }
        }
    }

    fn clusters(titles: &[&str]) -> Vec<Cluster> {
        let articles: Vec<Article> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| Article::new(&i.to_string(), t))
            .collect();
        cluster_articles(&articles, &ClusterParams::default())
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_cluster() {
        let mut list = clusters(&["Outage hits cloud", "Garbled story", "Partial story", "Fine story"]);
        let before: Vec<_> = list.iter().map(|c| (c.items.clone(), c.rep.clone())).collect();

        let stats = enrich_clusters(&mut list, &StubService::new(), 2).await;
        assert_eq!(stats.enriched, 2);
        assert_eq!(stats.failed, 2);

        assert!(list[0].enrichment_error.as_deref().unwrap().contains("connection reset"));
        assert!(!list[0].enhanced);
        assert!(list[1].enrichment_error.is_some());

        assert!(list[2].enhanced);
        assert_eq!(list[2].enrichment_warnings, vec!["missing:summaryZh", "unknown:mood"]);
        assert_eq!(list[2].enrichment.as_ref().unwrap().topic_zh, "部分");

        assert!(list[3].enhanced);
        assert!(list[3].enrichment_warnings.is_empty());

        let after: Vec<_> = list.iter().map(|c| (c.items.clone(), c.rep.clone())).collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let titles: Vec<String> = (0..8).map(|i| format!("Story number {} unique{}", i, i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let mut list = clusters(&refs);
        assert_eq!(list.len(), 8);

        let service = StubService::new();
        let stats = enrich_clusters(&mut list, &service, 3).await;
        assert_eq!(stats.enriched, 8);
        assert!(service.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_enhanced_clusters_are_skipped() {
        let mut list = clusters(&["Fine story"]);
        list[0].enhanced = true;
        let stats = enrich_clusters(&mut list, &StubService::new(), 1).await;
        assert_eq!(stats.skipped, 1);
        assert!(list[0].enrichment.is_none());
    }
}
