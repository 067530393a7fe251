//! Closed vocabularies used by title extraction.
//!
//! The company list is scanned in order, so more specific names must come
//! before names they contain.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Companies recognized in titles, lowercase.
pub const KNOWN_COMPANIES: &[&str] = &[
    "nvidia",
    "openai",
    "anthropic",
    "deepmind",
    "google",
    "microsoft",
    "apple",
    "amazon",
    "meta",
    "tesla",
    "intel",
    "amd",
    "ibm",
    "qualcomm",
    "samsung",
    "baidu",
    "alibaba",
    "tencent",
    "huawei",
    "bytedance",
];

// Words that carry no clustering signal in headlines
const STOP_WORDS_LIST: &[&str] = &[
    "the", "an", "and", "or", "but", "of", "in", "on", "at", "to", "for", "from", "by", "with",
    "as", "is", "are", "was", "were", "be", "been", "its", "it", "this", "that", "these", "those",
    "into", "over", "after", "before", "about", "new", "says", "said", "will", "has", "have",
    "how", "why", "what", "who", "than", "more", "up", "out", "via", "vs",
];

lazy_static! {
    pub static ref STOP_WORDS: HashSet<&'static str> = STOP_WORDS_LIST.iter().copied().collect();
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_list_is_lowercase_and_unique() {
        let unique: HashSet<_> = KNOWN_COMPANIES.iter().collect();
        assert_eq!(unique.len(), KNOWN_COMPANIES.len());
        assert!(KNOWN_COMPANIES.iter().all(|c| c.to_lowercase() == *c));
    }

    #[test]
    fn test_no_company_is_a_stop_word() {
        assert!(KNOWN_COMPANIES.iter().all(|c| !is_stop_word(c)));
        assert!(is_stop_word("the"));
    }
}
