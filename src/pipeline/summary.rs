use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use super::graph::{self, SentenceGraph};
use super::keywords::{content_tokens, score_terms};
use super::patterns::Patterns;
use super::sentences::{split_sentences, truncate_chars, Sentence};
use crate::error::SummaryError;

/// Longest prefix of the document that is fed to the sentence graph.
pub const MAX_INPUT_CHARS: usize = 100_000;
const MAX_LINKS: usize = 5;
const MIN_TAKEAWAY_CHARS: usize = 20;
const MIN_SUB_POINT_CHARS: usize = 10;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#).unwrap());
static TRAILING_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Sheet link:|DIY:|Context:|Note:)$").unwrap());
static INLINE_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[\x{2022}\x{25cf}*\-]\s+").unwrap());
static LEADING_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\x{2022}\x{25cf}*\-\s]+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    /// Size of the keyphrase vocabulary that biases the ranking walk.
    pub limit_phrases: usize,
    pub limit_sentences: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Generated { markdown: String, sentences: usize },
    Failed(SummaryError),
}

impl SummaryOutcome {
    /// Markdown for a generated summary, or the failure placeholder.
    pub fn into_markdown(self) -> String {
        match self {
            SummaryOutcome::Generated { markdown, .. } => markdown,
            SummaryOutcome::Failed(err) => format!("Summary generation failed: {err}"),
        }
    }
}

/// Select the most central sentences of `text`, in document order.
pub fn rank_sentences(
    text: &str,
    patterns: &Patterns,
    params: SummaryParams,
) -> Result<Vec<Sentence>, SummaryError> {
    let text = truncate_chars(text, MAX_INPUT_CHARS);
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return Err(SummaryError::NoSentences);
    }

    let token_sets: Vec<HashSet<String>> = sentences
        .iter()
        .map(|s| content_tokens(&s.text, patterns).collect())
        .collect();

    let vocabulary: HashSet<String> = score_terms(text, patterns, 1)
        .into_iter()
        .take(params.limit_phrases)
        .map(|t| t.term)
        .collect();
    let bias: Vec<f64> = token_sets
        .iter()
        .map(|set| 1.0 + set.intersection(&vocabulary).count() as f64)
        .collect();

    let graph = SentenceGraph::from_token_sets(&token_sets);
    let scores = graph::rank(&graph, &bias)?;
    debug!(
        sentences = graph.node_count(),
        edges = graph.edges().len(),
        "ranked sentence graph"
    );

    let picked: HashSet<usize> = graph::top_k_in_order(&scores, params.limit_sentences)
        .into_iter()
        .collect();
    Ok(sentences
        .into_iter()
        .filter(|s| picked.contains(&s.index))
        .collect())
}

/// Build the markdown summary. Never fails: degenerate input yields
/// [`SummaryOutcome::Failed`].
pub fn summarize(text: &str, patterns: &Patterns, params: SummaryParams) -> SummaryOutcome {
    match rank_sentences(text, patterns, params) {
        Ok(sentences) => {
            let points = takeaways(&sentences);
            let links = harvest_links(text);
            SummaryOutcome::Generated {
                markdown: render_markdown(&points, &links),
                sentences: sentences.len(),
            }
        }
        Err(err) => SummaryOutcome::Failed(err),
    }
}

/// Clean selected sentences into bullet-sized points: drop URLs and trailing
/// labels, discard short leftovers, split on inline bullet glyphs.
pub fn takeaways(sentences: &[Sentence]) -> Vec<String> {
    let mut points = Vec::new();
    for sentence in sentences {
        let without_urls = URL_RE.replace_all(&sentence.text, "");
        let cleaned = TRAILING_LABEL_RE.replace(without_urls.trim(), "");
        let cleaned = cleaned.trim();
        if cleaned.chars().count() <= MIN_TAKEAWAY_CHARS {
            continue;
        }
        for part in INLINE_BULLET_RE.split(cleaned) {
            let part = part.trim();
            if part.chars().count() > MIN_SUB_POINT_CHARS {
                points.push(LEADING_BULLET_RE.replace(part, "").into_owned());
            }
        }
    }
    points
}

/// URL-shaped tokens in first-seen order, de-duplicated, at most five.
pub fn harvest_links(text: &str) -> Vec<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .unique()
        .take(MAX_LINKS)
        .collect()
}

pub fn render_markdown(points: &[String], links: &[String]) -> String {
    let mut out = String::from("### Key Takeaways\n\n");
    for point in points {
        let _ = writeln!(out, "- {point}");
    }
    if !links.is_empty() {
        out.push_str("\n\n### \u{1f517} Helpful Links\n\n");
        for link in links {
            let target = if link.starts_with("http") {
                link.clone()
            } else {
                format!("https://{link}")
            };
            let _ = writeln!(out, "- [{link}]({target})");
        }
    }
    out
}
