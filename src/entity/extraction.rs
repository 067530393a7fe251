use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::companies::{is_stop_word, KNOWN_COMPANIES};
use super::TARGET_ENTITY;
use crate::clustering::tokenize::{normalize, TokenSet};

/// Template id assigned to "<Entity> announces breakthrough in (computer) vision technology".
pub const BREAKTHROUGH_TEMPLATE_ID: &str = "breakthrough-vision";

lazy_static! {
    static ref BREAKTHROUGH_TEMPLATE: Regex = Regex::new(
        r"(?i)^\s*(?P<entity>.+?)\s+announces\s+breakthrough\s+in\s+(?:computer\s+)?vision\s+technology\b"
    )
    .expect("breakthrough template regex is valid");
}

/// Per-title clustering signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub tokens: TokenSet,
    pub template_id: Option<String>,
    pub company: Option<String>,
}

/// Pulls tokens, a template id and a company out of a headline.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    companies: Vec<String>,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self {
            companies: KNOWN_COMPANIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends companies after the built-in list. Lowercased, blanks and
    /// duplicates skipped.
    pub fn with_extra_companies<S: AsRef<str>>(mut self, extra: &[S]) -> Self {
        for name in extra {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() && !self.companies.contains(&name) {
                self.companies.push(name);
            }
        }
        self
    }

    pub fn is_company(&self, token: &str) -> bool {
        self.companies.iter().any(|c| c == token)
    }

    /// First known company contained in the title, case-insensitive.
    pub fn detect_company(&self, title: &str) -> Option<String> {
        let lowered = title.to_lowercase();
        self.companies
            .iter()
            .find(|c| lowered.contains(c.as_str()))
            .cloned()
    }

    pub fn extract(&self, title: &str) -> TokenInfo {
        let mut tokens = normalize(title);
        tokens.retain(|t| !is_stop_word(t) || self.is_company(t));

        let (template_id, company) = match BREAKTHROUGH_TEMPLATE.captures(title) {
            Some(caps) => {
                let entity = caps["entity"].trim().to_lowercase();
                let company = if entity.is_empty() { None } else { Some(entity) };
                (Some(BREAKTHROUGH_TEMPLATE_ID.to_string()), company)
            }
            None => (None, self.detect_company(title)),
        };

        if let Some(company) = &company {
            // Multi-word captures contribute each word
            for token in normalize(company).iter() {
                tokens.insert(token.clone());
            }
            if self.is_company(company) {
                tokens.insert(company.clone());
            }
        }

        trace!(
            target: TARGET_ENTITY,
            "Extracted {} tokens from '{}' (template={:?}, company={:?})",
            tokens.len(),
            title,
            template_id,
            company
        );

        TokenInfo {
            tokens,
            template_id,
            company,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_match_captures_company() {
        let extractor = EntityExtractor::new();
        let info = extractor.extract("NVIDIA announces breakthrough in computer vision technology");
        assert_eq!(info.template_id.as_deref(), Some(BREAKTHROUGH_TEMPLATE_ID));
        assert_eq!(info.company.as_deref(), Some("nvidia"));

        let short = extractor.extract("NVIDIA announces breakthrough in vision technology");
        assert_eq!(short.template_id.as_deref(), Some(BREAKTHROUGH_TEMPLATE_ID));
        assert_eq!(short.company.as_deref(), Some("nvidia"));
    }

    #[test]
    fn test_template_captures_unknown_entity() {
        let info = EntityExtractor::new()
            .extract("Acme Robotics announces breakthrough in vision technology today");
        assert_eq!(info.company.as_deref(), Some("acme robotics"));
        assert!(info.tokens.contains("acme"));
        assert!(info.tokens.contains("robotics"));
    }

    #[test]
    fn test_fallback_company_detection_first_hit() {
        let extractor = EntityExtractor::new();
        let info = extractor.extract("Microsoft and Google sign cloud pact");
        assert_eq!(info.template_id, None);
        // list order decides, not position in the title
        assert_eq!(info.company.as_deref(), Some("google"));
    }

    #[test]
    fn test_company_added_to_tokens_from_substring() {
        let info = EntityExtractor::new().extract("OpenAI-backed startup raises funds");
        assert_eq!(info.company.as_deref(), Some("openai"));
        assert!(info.tokens.contains("openai"));
    }

    #[test]
    fn test_no_company() {
        let info = EntityExtractor::new().extract("Rainfall records broken across the region");
        assert_eq!(info.company, None);
        assert_eq!(info.template_id, None);
    }

    #[test]
    fn test_stop_words_removed_unless_company() {
        let info = EntityExtractor::new().extract("The rise of robots in the factory");
        assert!(!info.tokens.contains("the"));
        assert!(!info.tokens.contains("in"));
        assert!(info.tokens.contains("robots"));

        let extractor = EntityExtractor::new().with_extra_companies(&["WHO"]);
        let info = extractor.extract("WHO warns on AI health tools");
        assert!(info.tokens.contains("who"));
        assert_eq!(info.company.as_deref(), Some("who"));
    }
}
