use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use super::headings::detect_headings;
use super::normalize::clean_text;
use super::patterns::Patterns;
use crate::extract::DocumentKind;
use crate::models::{CleanedPage, RawPage, StructuredDocument};

const TITLE_SCAN_LINES: usize = 3;
const MIN_TITLE_CHARS: usize = 5;

/// Clean every page, detect its headings, derive the title and assemble the
/// full text. Pages without raw text are skipped. Per-page work runs in
/// parallel; assembly follows page order.
pub fn structure_document(
    source_name: &str,
    raw_pages: &[RawPage],
    patterns: &Patterns,
) -> StructuredDocument {
    let fallback_title = title_from_filename(source_name);

    let cleaned: Vec<(CleanedPage, Vec<String>)> = raw_pages
        .par_iter()
        .filter_map(|raw| {
            let text = raw.raw_text.as_deref().filter(|t| !t.is_empty())?;
            let content = clean_text(text, patterns);
            let lines: Vec<String> = content
                .split('\n')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
            let page = CleanedPage {
                page_number: raw.page_number,
                headings: detect_headings(&lines),
                content,
            };
            Some((page, lines))
        })
        .collect();

    let mut title: Option<String> = None;
    let mut all_text = String::new();
    let mut pages = Vec::with_capacity(cleaned.len());

    for (page, lines) in cleaned {
        if title.is_none() {
            title = title_candidate(&lines);
        }
        all_text.push_str(&page.content);
        all_text.push('\n');
        pages.push(page);
    }

    debug!(pages = pages.len(), chars = all_text.len(), "structured document");

    StructuredDocument {
        title: title.unwrap_or(fallback_title),
        pages,
        all_text,
    }
}

/// First of the leading lines that is longer than five characters and not a
/// bare number.
fn title_candidate(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .take(TITLE_SCAN_LINES)
        .find(|l| l.chars().count() > MIN_TITLE_CHARS && !l.chars().all(char::is_numeric))
        .cloned()
}

/// `intro_to-ml.pdf` becomes `Intro To Ml`. The extension is dropped only
/// for accepted document types.
pub fn title_from_filename(source_name: &str) -> String {
    let path = Path::new(source_name);
    let base = if DocumentKind::from_path(path).is_ok() {
        path.file_stem()
    } else {
        path.file_name()
    };
    let base = base.and_then(|n| n.to_str()).unwrap_or(source_name);
    title_case(&base.replace(['_', '-'], " "))
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_cased = false;
    for c in s.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_alphabetic();
    }
    out
}
