use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::patterns::Patterns;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct RankedTerm {
    pub term: String,
    pub score: f64,
}

/// Lowercased word tokens of two or more characters, stop words removed.
pub fn content_tokens<'a>(text: &'a str, patterns: &'a Patterns) -> impl Iterator<Item = String> + 'a {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| !patterns.is_stop_word(t))
}

/// Score every unigram and bigram of a single document.
///
/// With a one-document corpus the smoothed inverse document frequency is 1
/// for every term, so the weight reduces to term frequency, L2-normalised.
/// Bigrams are formed from adjacent tokens after stop-word removal. Ties keep
/// alphabetical term order.
pub fn score_terms(text: &str, patterns: &Patterns, max_ngram: usize) -> Vec<RankedTerm> {
    let tokens: Vec<String> = content_tokens(text, patterns).collect();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for n in 1..=max_ngram.max(1) {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }

    let norm = counts
        .values()
        .map(|&c| (c as f64).powi(2))
        .sum::<f64>()
        .sqrt();

    let mut ranked: Vec<RankedTerm> = counts
        .into_iter()
        .map(|(term, count)| RankedTerm {
            term,
            score: count as f64 / norm,
        })
        .collect();

    // stable sort keeps the BTreeMap's alphabetical order among equal scores
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Top `top_n` unigrams/bigrams of the document, best first.
pub fn top_keywords(text: &str, patterns: &Patterns, top_n: usize) -> Vec<String> {
    score_terms(text, patterns, 2)
        .into_iter()
        .take(top_n)
        .map(|t| t.term)
        .collect()
}
