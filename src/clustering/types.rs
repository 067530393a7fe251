use serde::{Deserialize, Serialize};
use std::fmt;

use crate::article::Article;
use crate::clustering::representative::compute_representative;
use crate::clustering::tokenize::TokenSet;
use crate::clustering::{DEFAULT_TAG_LIMIT, DEFAULT_THRESHOLD};
use crate::enrichment::Enrichment;
use crate::entity::TokenInfo;

/// How an incoming item is scored against an existing cluster.
///
/// A run uses exactly one policy; both keep first-match-wins assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scoring {
    /// Jaccard of the item's extracted tokens against the cluster representative.
    #[default]
    Representative,
    /// 0.6 title / 0.4 summary Jaccard against the cluster's founding item.
    Weighted,
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scoring::Representative => write!(f, "representative"),
            Scoring::Weighted => write!(f, "weighted"),
        }
    }
}

impl From<&str> for Scoring {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weighted" => Scoring::Weighted,
            _ => Scoring::Representative,
        }
    }
}

/// Parameters for a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterParams {
    /// Expected in [0, 1]; callers clamp, the engine does not.
    pub threshold: f64,
    pub title_merge: bool,
    pub scoring: Scoring,
    /// Fill topic/summary/key points/tags heuristically after clustering.
    pub generate_content: bool,
    pub tag_limit: usize,
    /// Company names added to the built-in list for this run.
    #[serde(default)]
    pub extra_companies: Vec<String>,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            title_merge: false,
            scoring: Scoring::default(),
            generate_content: true,
            tag_limit: DEFAULT_TAG_LIMIT,
            extra_companies: Vec::new(),
        }
    }
}

/// A group of near-duplicate articles.
///
/// `items` and `token_sets` are parallel and never empty. `rep` is derived
/// from `token_sets` on every membership change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub items: Vec<Article>,
    pub token_sets: Vec<TokenSet>,
    pub rep: TokenSet,
    /// Inherited from the founding item; only used for merge bucketing.
    pub template_id: Option<String>,
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
    #[serde(default)]
    pub enhanced: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrichment_warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_error: Option<String>,
}

impl Cluster {
    /// Starts a singleton cluster. The id is a placeholder until renumbering.
    pub fn new(article: Article, info: TokenInfo) -> Self {
        let mut cluster = Cluster {
            id: String::new(),
            items: vec![article],
            token_sets: vec![info.tokens],
            rep: TokenSet::new(),
            template_id: info.template_id,
            company: info.company,
            topic: None,
            summary: None,
            key_points: None,
            tags: None,
            enrichment: None,
            enhanced: false,
            enrichment_warnings: Vec::new(),
            enrichment_error: None,
        };
        cluster.recompute_rep();
        cluster
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_singleton(&self) -> bool {
        self.items.len() == 1
    }

    pub fn first_title(&self) -> &str {
        self.items.first().map(|a| a.title.as_str()).unwrap_or("")
    }

    /// Appends one article and rebuilds the representative.
    pub fn push(&mut self, article: Article, tokens: TokenSet) {
        self.items.push(article);
        self.token_sets.push(tokens);
        self.membership_changed();
    }

    /// Moves every member of `other` into this cluster. Founding metadata of
    /// `self` is kept.
    pub fn absorb(&mut self, other: Cluster) {
        self.items.extend(other.items);
        self.token_sets.extend(other.token_sets);
        self.membership_changed();
    }

    /// Content derived from the old membership no longer describes the
    /// cluster, so it is dropped along with any enrichment.
    fn membership_changed(&mut self) {
        self.recompute_rep();
        self.topic = None;
        self.summary = None;
        self.key_points = None;
        self.tags = None;
        self.enrichment = None;
        self.enhanced = false;
        self.enrichment_warnings.clear();
        self.enrichment_error = None;
    }

    /// Rebuilds `rep` from the full membership.
    ///
    /// If every member has an empty token set, the founder's id becomes a
    /// sentinel token so `rep` is never empty.
    pub fn recompute_rep(&mut self) {
        let mut rep = compute_representative(&self.token_sets);
        if rep.is_empty() {
            if let Some(first) = self.items.first() {
                rep.insert(format!("#{}", first.id.to_lowercase()));
            }
        }
        self.rep = rep;
    }
}
