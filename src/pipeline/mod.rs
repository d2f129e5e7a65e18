pub mod graph;
pub mod headings;
pub mod keywords;
pub mod normalize;
pub mod notes;
pub mod patterns;
pub mod sentences;
pub mod structure;
pub mod summary;

use tracing::{debug, warn};

use crate::error::SettingsError;
use crate::models::{Analysis, RawPage, StructuredDocument};
use crate::settings::Settings;
use patterns::Patterns;
use summary::{SummaryOutcome, SummaryParams};

/// Stateless analysis pipeline. Built once from settings and shared by
/// reference across every ingestion.
#[derive(Debug, Clone)]
pub struct Pipeline {
    patterns: Patterns,
    keyword_count: usize,
    summary: SummaryParams,
    fallback: SummaryParams,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Pipeline {
            patterns: Patterns::from_settings(settings)?,
            keyword_count: settings.keyword_count,
            summary: SummaryParams {
                limit_phrases: settings.summary_phrases,
                limit_sentences: settings.summary_sentences,
            },
            fallback: SummaryParams {
                limit_phrases: settings.fallback_phrases,
                limit_sentences: settings.fallback_sentences,
            },
        })
    }

    /// Pass 1: clean pages, detect headings, derive title and full text.
    pub fn structure(&self, source_name: &str, pages: &[RawPage]) -> StructuredDocument {
        structure::structure_document(source_name, pages, &self.patterns)
    }

    pub fn summarize(&self, text: &str) -> SummaryOutcome {
        summary::summarize(text, &self.patterns, self.summary)
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        keywords::top_keywords(text, &self.patterns, self.keyword_count)
    }

    /// Structure → summary + keywords + notes.
    pub fn analyze(&self, source_name: &str, pages: &[RawPage]) -> Analysis {
        let doc = self.structure(source_name, pages);

        let outcome = self.summarize(&doc.all_text);
        match &outcome {
            SummaryOutcome::Generated { sentences, .. } => {
                debug!(source = source_name, sentences = *sentences, "summary generated")
            }
            SummaryOutcome::Failed(err) => {
                warn!(source = source_name, error = %err, "summary degraded to placeholder")
            }
        }
        let keywords = self.keywords(&doc.all_text);
        let notes = notes::generate_notes(&doc.pages, &self.patterns, self.fallback);

        debug!(
            source = source_name,
            pages = doc.pages.len(),
            keywords = keywords.len(),
            note_pages = notes.len(),
            "analysis complete"
        );

        Analysis {
            title: doc.title,
            summary: outcome.into_markdown(),
            keywords,
            notes,
            all_text: doc.all_text,
            pages: doc.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(&Settings::default()).unwrap()
    }

    fn page(n: usize, text: &str) -> RawPage {
        RawPage {
            page_number: n,
            raw_text: Some(text.to_string()),
        }
    }

    #[test]
    fn zero_page_document() {
        let a = pipeline().analyze("intro_to_ml.pdf", &[]);
        assert_eq!(a.title, "Intro To Ml");
        assert_eq!(a.all_text, "");
        assert!(a.summary.starts_with("Summary generation failed:"));
        assert!(a.keywords.is_empty());
        assert!(a.notes.is_empty());
        assert!(a.pages.is_empty());
    }

    #[test]
    fn scenario_neural_networks_page() {
        let a = pipeline().analyze(
            "nn.pdf",
            &[page(1, "NEURAL NETWORKS\nA Neural Network is defined as a computing system.\nPage 1 of 10")],
        );
        assert!(!a.all_text.contains("Page 1 of 10"));
        assert_eq!(a.pages[0].headings, vec!["NEURAL NETWORKS"]);
        assert_eq!(a.notes.len(), 1);
        assert_eq!(a.notes[0].points[0].heading, "NEURAL NETWORKS");
        assert_eq!(
            a.notes[0].points[0].point,
            "A Neural Network is defined as a computing system."
        );
        assert!(a.keywords.len() <= 12);
        assert!(a.keywords.contains(&"neural".to_string()));
    }

    #[test]
    fn fixture_lecture() {
        let text = std::fs::read_to_string("tests/fixtures/neural_networks.txt").unwrap();
        let pages: Vec<RawPage> = text
            .split('\u{c}')
            .enumerate()
            .map(|(i, t)| page(i + 1, t))
            .collect();
        let a = pipeline().analyze("neural_networks.pdf", &pages);

        assert_eq!(a.title, "Neural Networks");
        assert_eq!(a.keywords.len(), 12);
        assert!(a.summary.starts_with("### Key Takeaways"));
        assert!(a.summary.contains("Helpful Links"));
        assert!(a.summary.contains("(https://www.deeplearningbook.org)"));
        assert!(!a.all_text.to_lowercase().contains("confidential"));
        for notes in &a.notes {
            let page = a.pages.iter().find(|p| p.page_number == notes.page_number).unwrap();
            for point in &notes.points {
                assert!(!page.headings.contains(&point.point));
            }
        }
        let fallback_page = a.notes.iter().find(|n| n.page_number == 3).unwrap();
        assert!(fallback_page.points.iter().all(|p| p.heading == "Summary Point"));
        assert!(fallback_page.points.len() <= 2);
    }

    #[test]
    fn analysis_is_deterministic() {
        let pages = [page(1, "Loss Functions\nCross entropy measures the gap between distributions.")];
        assert_eq!(pipeline().analyze("a.pdf", &pages), pipeline().analyze("a.pdf", &pages));
    }
}
