use strsim::sorensen_dice;

use crate::article::Article;
use crate::clustering::tokenize::{normalize, TokenSet};

/// Weight of title overlap in [`item_similarity`].
pub const TITLE_WEIGHT: f64 = 0.6;
/// Weight of summary overlap in [`item_similarity`].
pub const SUMMARY_WEIGHT: f64 = 0.4;

/// |A ∩ B| / |A ∪ B|, or 0 when either side is empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection_len(b);
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

/// Title and summary token sets of one article, computed once per run.
#[derive(Debug, Clone)]
pub struct ItemTokens {
    pub title: TokenSet,
    pub summary: TokenSet,
}

impl ItemTokens {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: normalize(&article.title),
            summary: normalize(&article.summary),
        }
    }

    pub fn similarity(&self, other: &ItemTokens) -> f64 {
        TITLE_WEIGHT * jaccard(&self.title, &other.title)
            + SUMMARY_WEIGHT * jaccard(&self.summary, &other.summary)
    }
}

/// Weighted title + summary similarity between two articles.
pub fn item_similarity(a: &Article, b: &Article) -> f64 {
    ItemTokens::from_article(a).similarity(&ItemTokens::from_article(b))
}

/// Dice coefficient over character bigrams of two case-folded titles.
///
/// Stricter than word Jaccard; used only by the title second pass.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(text: &str) -> TokenSet {
        normalize(text)
    }

    #[test]
    fn test_jaccard_basic() {
        let a = set("apple launches vision headset");
        let b = set("apple delays vision headset");
        assert!((jaccard(&a, &b) - 3.0 / 5.0).abs() < 1e-9);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_jaccard_empty_is_zero() {
        let empty = TokenSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&empty, &set("word")), 0.0);
    }

    #[test]
    fn test_item_similarity_weights() {
        let a = Article::new("1", "chip exports curbed").with_summary("new rules today");
        let b = Article::new("2", "chip exports curbed").with_summary("markets rally");
        assert!((item_similarity(&a, &b) - TITLE_WEIGHT).abs() < 1e-9);

        let c = Article::new("3", "other words").with_summary("new rules today");
        assert!((item_similarity(&a, &c) - SUMMARY_WEIGHT).abs() < 1e-9);
    }

    #[test]
    fn test_similarities_are_symmetric_and_bounded() {
        let pairs = [
            ("Google unveils Gemini 2", "Gemini 2 unveiled by Google"),
            ("", "Something"),
            ("Same title", "same title"),
            ("人工智能发展", "人工智能突破"),
        ];
        for (x, y) in pairs {
            let ax = Article::new("x", x).with_summary(y);
            let ay = Article::new("y", y).with_summary(x);
            for (s1, s2) in [
                (jaccard(&set(x), &set(y)), jaccard(&set(y), &set(x))),
                (item_similarity(&ax, &ay), item_similarity(&ay, &ax)),
                (title_similarity(x, y), title_similarity(y, x)),
            ] {
                assert!((s1 - s2).abs() < 1e-12);
                assert!((0.0..=1.0).contains(&s1));
            }
        }
    }

    #[test]
    fn test_title_similarity_case_folded() {
        assert_eq!(title_similarity("OpenAI Ships GPT", "openai ships gpt"), 1.0);
        assert!(
            title_similarity(
                "OpenAI ships new GPT model to all users",
                "OpenAI ships new GPT model to all users!"
            ) > 0.93
        );
        assert!(title_similarity("OpenAI ships GPT-5", "Tesla recalls cars") < 0.3);
    }
}
