use rayon::prelude::*;
use tracing::{debug, warn};

use super::patterns::Patterns;
use super::sentences::truncate_chars;
use super::summary::{rank_sentences, SummaryParams};
use crate::error::SummaryError;
use crate::models::{CleanedPage, NotePoint, PageNotes};

pub const DEFAULT_HEADING: &str = "Key Discussion";
pub const FALLBACK_HEADING: &str = "Summary Point";
const MIN_LINE_CHARS: usize = 5;
const FALLBACK_MIN_CONTENT_CHARS: usize = 50;
const FALLBACK_INPUT_CHARS: usize = 2000;

/// How a page's notes were obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum PageNoteOutcome {
    Heuristic(Vec<NotePoint>),
    Fallback(Vec<NotePoint>),
    FallbackFailed(SummaryError),
    Empty,
}

impl PageNoteOutcome {
    pub fn into_points(self) -> Vec<NotePoint> {
        match self {
            PageNoteOutcome::Heuristic(points) | PageNoteOutcome::Fallback(points) => points,
            PageNoteOutcome::FallbackFailed(_) | PageNoteOutcome::Empty => Vec::new(),
        }
    }
}

/// Heading-scoped salient lines of one page. Lines equal to a detected
/// heading switch the current heading and are never emitted as points.
pub fn heuristic_points(page: &CleanedPage, patterns: &Patterns) -> Vec<NotePoint> {
    let mut points = Vec::new();
    let mut current_heading: &str = DEFAULT_HEADING;

    for line in page.content.split('\n').map(str::trim) {
        if line.chars().count() < MIN_LINE_CHARS {
            continue;
        }
        if let Some(heading) = page.headings.iter().find(|h| h.as_str() == line) {
            current_heading = heading.as_str();
            continue;
        }
        if is_salient(line, patterns) {
            points.push(NotePoint {
                heading: current_heading.to_string(),
                point: line.to_string(),
            });
        }
    }
    points
}

fn is_salient(line: &str, patterns: &Patterns) -> bool {
    let lower = line.to_lowercase();
    patterns.is_bullet(line)
        || patterns.has_context_keyword(&lower)
        || patterns.has_definition(&lower)
        || is_significant(line)
}

/// A self-contained sentence: 21..=199 characters, capitalised, ending in
/// `.`, `?` or `:`.
pub fn is_significant(line: &str) -> bool {
    let len = line.chars().count();
    20 < len
        && len < 200
        && line.chars().next().is_some_and(char::is_uppercase)
        && line.ends_with(['.', '?', ':'])
}

/// Notes for one page, falling back to the top sentences of the page when no
/// line qualifies.
pub fn extract_page(
    page: &CleanedPage,
    patterns: &Patterns,
    fallback: SummaryParams,
) -> PageNoteOutcome {
    let points = heuristic_points(page, patterns);
    if !points.is_empty() {
        return PageNoteOutcome::Heuristic(points);
    }
    if page.content.trim().chars().count() <= FALLBACK_MIN_CONTENT_CHARS {
        return PageNoteOutcome::Empty;
    }

    let input = truncate_chars(&page.content, FALLBACK_INPUT_CHARS);
    match rank_sentences(input, patterns, fallback) {
        Ok(sentences) => PageNoteOutcome::Fallback(
            sentences
                .into_iter()
                .map(|s| NotePoint {
                    heading: FALLBACK_HEADING.to_string(),
                    point: s.text.trim().to_string(),
                })
                .collect(),
        ),
        Err(err) => PageNoteOutcome::FallbackFailed(err),
    }
}

/// Exam notes for every page that yields at least one point, in page order.
pub fn generate_notes(
    pages: &[CleanedPage],
    patterns: &Patterns,
    fallback: SummaryParams,
) -> Vec<PageNotes> {
    pages
        .par_iter()
        .map(|page| {
            let outcome = extract_page(page, patterns, fallback);
            match &outcome {
                PageNoteOutcome::Fallback(points) => {
                    debug!(page = page.page_number, points = points.len(), "used summary fallback")
                }
                PageNoteOutcome::FallbackFailed(err) => {
                    warn!(page = page.page_number, error = %err, "summary fallback failed")
                }
                _ => {}
            }
            PageNotes {
                page_number: page.page_number,
                points: outcome.into_points(),
            }
        })
        .filter(|notes| !notes.points.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::headings::detect_headings;
    use crate::settings::Settings;

    fn patterns() -> Patterns {
        Patterns::from_settings(&Settings::default()).unwrap()
    }

    fn fallback() -> SummaryParams {
        SummaryParams {
            limit_phrases: 10,
            limit_sentences: 2,
        }
    }

    fn page(number: usize, content: &str) -> CleanedPage {
        let lines: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        CleanedPage {
            page_number: number,
            content: content.to_string(),
            headings: detect_headings(&lines),
        }
    }

    #[test]
    fn definition_under_detected_heading() {
        let p = page(1, "NEURAL NETWORKS\nA Neural Network is defined as a computing system.");
        let points = heuristic_points(&p, &patterns());
        assert_eq!(
            points,
            vec![NotePoint {
                heading: "NEURAL NETWORKS".into(),
                point: "A Neural Network is defined as a computing system.".into(),
            }]
        );
    }

    #[test]
    fn default_heading_before_any_heading() {
        let p = page(1, "- gradients flow backwards\nOPTIMIZERS\n1. adam keeps moments");
        let points = heuristic_points(&p, &patterns());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].heading, DEFAULT_HEADING);
        assert_eq!(points[1].heading, "OPTIMIZERS");
    }

    #[test]
    fn classifier_rules() {
        let p = patterns();
        assert!(is_salient("\u{25cf} dropout regularises", &p));
        assert!(is_salient("a) first option", &p));
        assert!(is_salient("we ask why this works", &p));
        assert!(is_salient("remember: scale inputs", &p));
        assert!(is_salient("overfitting means memorising noise", &p));
        assert!(is_salient("Batch normalization stabilises training.", &p));
        assert!(!is_salient("batch normalization stabilises training", &p));
        assert!(!is_salient("Short one.", &p));
    }

    #[test]
    fn significance_bounds() {
        assert!(!is_significant(&format!("A{}.", "b".repeat(18))));
        assert!(is_significant(&format!("A{}.", "b".repeat(19))));
        assert!(is_significant(&format!("A{}?", "b".repeat(197))));
        assert!(!is_significant(&format!("A{}?", "b".repeat(198))));
    }

    #[test]
    fn short_lines_skipped() {
        let p = page(1, "- ab\n1. x");
        assert!(heuristic_points(&p, &patterns()).is_empty());
    }

    #[test]
    fn headings_never_emitted_as_points() {
        let p = page(
            2,
            "Key Components:\n- Neurons: Basic units of computation.\nKey Components:\nSummary of the training steps:",
        );
        let points = heuristic_points(&p, &patterns());
        for point in &points {
            assert!(!p.headings.contains(&point.point));
        }
        assert_eq!(points[0].heading, "Key Components:");
        assert_eq!(points.last().unwrap().point, "Summary of the training steps:");
    }

    #[test]
    fn fallback_for_plain_prose() {
        let prose = "the model keeps learning slowly over time and the loss keeps going down again";
        assert!(prose.len() > 50 && prose.len() < 100);
        let outcome = extract_page(&page(4, prose), &patterns(), fallback());
        let PageNoteOutcome::Fallback(points) = outcome else {
            panic!("expected fallback, got {outcome:?}");
        };
        assert!(!points.is_empty() && points.len() <= 2);
        assert!(points.iter().all(|p| p.heading == FALLBACK_HEADING));
    }

    #[test]
    fn fallback_caps_at_two_sentences() {
        let prose = "the encoder reads tokens\n\nthe decoder writes tokens\n\nattention links encoder and decoder tokens\n\nwe train the whole thing end to end";
        let points = extract_page(&page(1, prose), &patterns(), fallback()).into_points();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn fallback_reads_only_the_start_of_the_page() {
        let mut content = "lorem ipsum dolor amet sit\n\n".repeat(100);
        assert!(content.chars().count() > FALLBACK_INPUT_CHARS);
        content.push_str("zebra stripes confuse every predator");
        let outcome = extract_page(&page(5, &content), &patterns(), fallback());
        let PageNoteOutcome::Fallback(points) = outcome else {
            panic!("expected fallback, got {outcome:?}");
        };
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| !p.point.contains("zebra")));
    }

    #[test]
    fn short_pages_without_points_are_empty() {
        let outcome = extract_page(&page(1, "tiny page text"), &patterns(), fallback());
        assert_eq!(outcome, PageNoteOutcome::Empty);
    }

    #[test]
    fn pages_without_points_are_omitted() {
        let pages = vec![
            page(1, "- first bullet point"),
            page(2, "tiny"),
            page(3, "Convolutions share weights across positions."),
        ];
        let notes = generate_notes(&pages, &patterns(), fallback());
        assert_eq!(notes.iter().map(|n| n.page_number).collect::<Vec<_>>(), vec![1, 3]);
    }
}
