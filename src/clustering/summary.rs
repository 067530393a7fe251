use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::clustering::tokenize::tokenize;
use crate::clustering::types::{Cluster, ClusterParams};
use crate::entity::companies::is_stop_word;

/// Maximum number of member titles used as key points.
pub const MAX_KEY_POINTS: usize = 5;

/// Maximum number of sources named in a multi-item summary.
pub const MAX_NAMED_SOURCES: usize = 3;

/// Number of tokens joined into a heuristic topic.
pub const TOPIC_TOKENS: usize = 3;

pub const KEY_POINTS_PLACEHOLDER: &str = "No key points available.";
pub const TOPIC_PLACEHOLDER: &str = "General News";
const TOPIC_DOMAIN_PHRASE: &str = "developments in AI and technology";

// Headline filler that never makes a useful topic word
const GENERIC_TOPIC_WORDS: &[&str] = &[
    "news", "update", "updates", "report", "reports", "latest", "today", "week", "announces",
    "announced", "launches", "unveils", "breaking", "live", "first", "big", "now", "just",
];

lazy_static! {
    static ref BANNED_PHRASES: Regex = Regex::new(
        r"(?i)\b(?:groundbreaking|ground-breaking|significant advances?|revolutionary|game[- ]changing|cutting[- ]edge|unprecedented)\b"
    )
    .expect("banned phrase regex is valid");
}

fn is_generic(token: &str) -> bool {
    is_stop_word(token) || GENERIC_TOPIC_WORDS.contains(&token)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Removes marketing clichés case-insensitively and collapses whitespace.
pub fn strip_banned_phrases(text: &str) -> String {
    BANNED_PHRASES
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Topic from the most frequent title tokens.
///
/// Tokens are ranked by how often they occur across all member titles,
/// repeats within a title included, ties broken alphabetically. The top three
/// non-generic tokens are capitalized and joined; with fewer survivors the
/// single top-ranked token is used.
pub fn heuristic_topic(cluster: &Cluster) -> String {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in &cluster.items {
        for token in tokenize(&item.title) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let surviving: Vec<&str> = ranked
        .iter()
        .map(|(t, _)| t.as_str())
        .filter(|t| !is_generic(t))
        .collect();

    let topic = if surviving.len() >= TOPIC_TOKENS {
        surviving[..TOPIC_TOKENS]
            .iter()
            .map(|t| capitalize(t))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        let fallback = surviving
            .first()
            .copied()
            .or_else(|| ranked.first().map(|(t, _)| t.as_str()));
        match fallback {
            Some(t) => capitalize(t),
            None => TOPIC_PLACEHOLDER.to_string(),
        }
    };

    let cleaned = strip_banned_phrases(&topic);
    if cleaned.is_empty() {
        TOPIC_PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

/// Distinct non-empty sources in member order.
fn distinct_sources(cluster: &Cluster) -> Vec<&str> {
    let mut seen = HashSet::new();
    cluster
        .items
        .iter()
        .map(|a| a.source.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}

/// Single items echo their own summary (title when blank); larger clusters
/// get a sentence naming up to three sources.
pub fn heuristic_summary(cluster: &Cluster) -> String {
    let summary = if cluster.len() <= 1 {
        match cluster.items.first() {
            Some(item) if !item.summary.trim().is_empty() => item.summary.clone(),
            Some(item) => item.title.clone(),
            None => String::new(),
        }
    } else {
        let sources = distinct_sources(cluster);
        let named = sources
            .iter()
            .take(MAX_NAMED_SOURCES)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        let remaining = sources.len().saturating_sub(MAX_NAMED_SOURCES);

        match (named.is_empty(), remaining) {
            (true, _) => format!(
                "{} related reports on {}.",
                cluster.len(),
                TOPIC_DOMAIN_PHRASE
            ),
            (false, 0) => format!(
                "{} related reports from {} on {}.",
                cluster.len(),
                named,
                TOPIC_DOMAIN_PHRASE
            ),
            (false, n) => format!(
                "{} related reports from {} and {} more source{} on {}.",
                cluster.len(),
                named,
                n,
                if n == 1 { "" } else { "s" },
                TOPIC_DOMAIN_PHRASE
            ),
        }
    };

    strip_banned_phrases(&summary)
}

/// Up to five distinct member titles, compared case-insensitively.
pub fn heuristic_key_points(cluster: &Cluster) -> Vec<String> {
    let mut seen = HashSet::new();
    let points: Vec<String> = cluster
        .items
        .iter()
        .map(|a| a.title.trim())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .take(MAX_KEY_POINTS)
        .map(str::to_string)
        .collect();

    if points.is_empty() {
        vec![KEY_POINTS_PLACEHOLDER.to_string()]
    } else {
        points
    }
}

/// Union of member tags ranked by frequency, first appearance breaking ties.
pub fn heuristic_tags(cluster: &Cluster, limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for tag in cluster.items.iter().flat_map(|a| a.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert(0);
        if *count == 0 {
            order.push(tag.as_str());
        }
        *count += 1;
    }

    // stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(limit).map(str::to_string).collect()
}

/// Fills any absent heuristic field. Values already set, including ones from
/// enrichment, are never overwritten.
pub fn fill_heuristic_content(cluster: &mut Cluster, tag_limit: usize) {
    if cluster.topic.is_none() {
        cluster.topic = Some(heuristic_topic(cluster));
    }
    if cluster.summary.is_none() {
        cluster.summary = Some(heuristic_summary(cluster));
    }
    if cluster.key_points.is_none() {
        cluster.key_points = Some(heuristic_key_points(cluster));
    }
    if cluster.tags.is_none() {
        cluster.tags = Some(heuristic_tags(cluster, tag_limit));
    }
}

/// Fills absent heuristic content on every cluster when `params` asks for
/// it. Clusters whose membership changed since the last fill get fresh
/// content; the rest keep what they have.
pub fn fill_all_heuristic_content(clusters: &mut [Cluster], params: &ClusterParams) {
    if !params.generate_content {
        return;
    }
    for cluster in clusters.iter_mut() {
        fill_heuristic_content(cluster, params.tag_limit);
    }
}
