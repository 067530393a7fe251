use std::collections::HashMap;

use crate::clustering::tokenize::TokenSet;
use crate::clustering::REP_FALLBACK_TOKENS;

/// Majority-vote token set over a cluster's member token sets.
///
/// A token is kept when it appears in at least `ceil(n / 2)` members. When no
/// token qualifies, falls back to the first [`REP_FALLBACK_TOKENS`] tokens of the
/// founding member in their original order. Output order is first appearance
/// across members.
pub fn compute_representative(token_sets: &[TokenSet]) -> TokenSet {
    let n = token_sets.len();
    if n == 0 {
        return TokenSet::new();
    }
    let needed = n.div_ceil(2);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut seen_order: Vec<&str> = Vec::new();
    for set in token_sets {
        for token in set {
            let count = counts.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                seen_order.push(token.as_str());
            }
            *count += 1;
        }
    }

    let rep: TokenSet = seen_order
        .into_iter()
        .filter(|t| counts.get(t).copied().unwrap_or(0) >= needed)
        .collect();

    if !rep.is_empty() {
        return rep;
    }

    token_sets[0]
        .iter()
        .take(REP_FALLBACK_TOKENS)
        .cloned()
        .collect()
}
