use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::TARGET_CLUSTER;

/// Maximum number of tags kept on a normalized article.
pub const MAX_ARTICLE_TAGS: usize = 10;

/// Title given to articles that arrive without one.
pub const UNTITLED: &str = "Untitled";

/// A normalized news article. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// Builds an article with only an id and a title, mostly useful in tests.
    pub fn new(id: &str, title: &str) -> Self {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            summary: String::new(),
            url: String::new(),
            source: String::new(),
            date: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags
            .iter()
            .take(MAX_ARTICLE_TAGS)
            .map(|t| t.to_string())
            .collect();
        self
    }

    /// Normalizes one element of an arbitrary JSON article list.
    ///
    /// Missing or mistyped fields fall back to defaults; the id is synthesized
    /// from `index` when absent.
    pub fn from_json(value: &Value, index: usize) -> Self {
        let id = match value.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => format!("a{}", index),
        };

        let title = string_field(value, "title")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let summary = string_field(value, "summary")
            .or_else(|| string_field(value, "description"))
            .unwrap_or_default();

        let tags = value
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .take(MAX_ARTICLE_TAGS)
                    .collect()
            })
            .unwrap_or_default();

        Article {
            id,
            title,
            summary,
            url: string_field(value, "url").unwrap_or_default(),
            source: string_field(value, "source").unwrap_or_default(),
            date: string_field(value, "date").unwrap_or_default(),
            tags,
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

/// Normalizes an arbitrary JSON document into a list of articles.
///
/// Accepts either a bare array or an object carrying an `articles` array.
/// Anything else yields an empty list.
pub fn normalize_articles(value: &Value) -> Vec<Article> {
    let list = match value {
        Value::Array(list) => list,
        Value::Object(map) => match map.get("articles") {
            Some(Value::Array(list)) => list,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let articles: Vec<Article> = list
        .iter()
        .enumerate()
        .map(|(i, v)| Article::from_json(v, i))
        .collect();

    debug!(target: TARGET_CLUSTER, "Normalized {} articles", articles.len());
    articles
}
