// Module declarations
pub mod assignment;
pub mod engine;
pub mod merging;
pub mod representative;
pub mod similarity;
pub mod summary;
pub mod tokenize;
pub mod types;
pub mod util;

pub use types::*;

pub use assignment::build_clusters;
pub use engine::{cluster_articles, cluster_articles_with};
pub use merging::{merge_similar_titles, merge_template_buckets, regroup_by_company};
pub use representative::compute_representative;
pub use similarity::{item_similarity, jaccard, title_similarity};
pub use summary::{fill_all_heuristic_content, fill_heuristic_content};
pub use tokenize::{normalize, tokenize, TokenSet};
pub use util::{find_cluster, renumber};

/// Default similarity threshold for joining a cluster
pub const DEFAULT_THRESHOLD: f64 = 0.86;

/// Title similarity a pair of clusters must exceed in the title pass
pub const TITLE_MERGE_THRESHOLD: f64 = 0.93;

/// Tokens kept from the founding member when the majority vote is empty
pub const REP_FALLBACK_TOKENS: usize = 6;

/// Default cap on heuristic cluster tags
pub const DEFAULT_TAG_LIMIT: usize = 12;
