// prompts.rs

use crate::clustering::Cluster;

/// Member titles listed in an enrichment prompt.
pub const MAX_PROMPT_TITLES: usize = 10;

pub fn enrichment_prompt(cluster: &Cluster) -> String {
    let titles = cluster
        .items
        .iter()
        .take(MAX_PROMPT_TITLES)
        .enumerate()
        .map(|(i, a)| {
            if a.source.is_empty() {
                format!("{}. {}", i + 1, a.title)
            } else {
                format!("{}. [{}] {}", i + 1, a.source, a.title)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let key_points = cluster
        .key_points
        .as_ref()
        .map(|points| {
            points
                .iter()
                .map(|p| format!("- {}", p))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    format!(
        r#"You are given a cluster of {count} related news articles.

TOPIC: {topic}
SUMMARY: {summary}

ARTICLE TITLES:
{titles}

KEY POINTS:
{key_points}

Respond with a single JSON object and nothing else, using exactly these fields:
  "topicZh": string, the topic translated to Simplified Chinese, at most 40 characters (required)
  "summaryZh": string, a neutral two-sentence summary in Simplified Chinese, at most 400 characters (required)
  "keyPointsEnRefined": array of up to 5 short English key points (optional)
  "keyPointsZh": array of up to 5 short Simplified Chinese key points (optional)
  "promptImproved": string, a one-paragraph illustration prompt for a cover image (optional)
  "notes": string, anything uncertain about the cluster (optional)

Do not use marketing language such as "groundbreaking" or "revolutionary"."#,
        count = cluster.len(),
        topic = cluster.topic.as_deref().unwrap_or(cluster.first_title()),
        summary = cluster.summary.as_deref().unwrap_or(""),
        titles = titles,
        key_points = key_points,
    )
}
