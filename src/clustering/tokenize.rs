use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tokens shorter than this many characters are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

/// A set of normalized tokens that remembers insertion order.
///
/// Membership checks go through the hash set; iteration follows the order in
/// which tokens were first inserted, which keeps representatives and
/// serialized output deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TokenSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a token, returning false if it was already present.
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        let token = token.into();
        if self.members.contains(&token) {
            return false;
        }
        self.members.insert(token.clone());
        self.order.push(token);
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.members.contains(token)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Number of tokens present in both sets.
    pub fn intersection_len(&self, other: &TokenSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|t| large.contains(t)).count()
    }

    /// Drops every token matching the predicate, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let members = &mut self.members;
        self.order.retain(|t| {
            let kept = keep(t);
            if !kept {
                members.remove(t);
            }
            kept
        });
    }
}

impl PartialEq for TokenSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for TokenSet {}

impl From<Vec<String>> for TokenSet {
    fn from(tokens: Vec<String>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<TokenSet> for Vec<String> {
    fn from(set: TokenSet) -> Self {
        set.order
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// CJK Unified Ideographs plus Extension A.
fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

/// Splits free text into tokens, keeping repeats in text order.
///
/// Lowercases, turns everything but ASCII alphanumerics and CJK ideographs into
/// separators, and drops tokens shorter than [`MIN_TOKEN_CHARS`].
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || is_cjk_ideograph(c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Splits free text into a comparable token set. See [`tokenize`].
pub fn normalize(text: &str) -> TokenSet {
    tokenize(text).into_iter().collect()
}
