pub mod queue;
pub mod schema;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use queue::{enrich_clusters, EnrichmentStats};
pub use schema::{parse_enrichment, validate_enrichment};

/// Default number of clusters enriched in parallel.
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 3;

/// Text completion backend used for enrichment.
#[allow(async_fn_in_trait)]
pub trait CompletionService {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Externally generated content attached to a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub topic_zh: String,
    pub summary_zh: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points_en_refined: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points_zh: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_improved: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Enrichment {
    pub(crate) fn set_text(&mut self, field: &str, value: String) {
        match field {
            "topicZh" => self.topic_zh = value,
            "summaryZh" => self.summary_zh = value,
            "promptImproved" => self.prompt_improved = Some(value),
            "notes" => self.notes = Some(value),
            _ => {}
        }
    }

    pub(crate) fn set_list(&mut self, field: &str, value: Vec<String>) {
        match field {
            "keyPointsEnRefined" => self.key_points_en_refined = value,
            "keyPointsZh" => self.key_points_zh = value,
            _ => {}
        }
    }
}
