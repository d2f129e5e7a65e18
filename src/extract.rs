use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, info};

use crate::error::IngestError;
use crate::models::RawPage;

const PAGE_BREAK: char = '\u{c}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Accepted document types, by extension.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("pdf") => Ok(DocumentKind::Pdf),
            Some("txt") => Ok(DocumentKind::Text),
            _ => Err(IngestError::Unsupported(path.to_path_buf())),
        }
    }
}

/// Read a document and split it into numbered pages. Pages with no
/// extractable text come back with `raw_text: None`.
pub fn extract_pages(path: &Path) -> Result<Vec<RawPage>, IngestError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let texts = match kind {
        DocumentKind::Pdf => pdf_pages(&bytes).map_err(|reason| IngestError::Extraction {
            path: path.to_path_buf(),
            reason,
        })?,
        DocumentKind::Text => text_pages(&String::from_utf8_lossy(&bytes)),
    };

    let pages = number_pages(texts);
    let empty = pages.iter().filter(|p| p.raw_text.is_none()).count();
    info!(file = %path.display(), pages = pages.len(), empty, "extracted pages");
    Ok(pages)
}

/// `pdf_extract` panics on some malformed files; treat that as a failed
/// extraction.
fn pdf_pages(bytes: &[u8]) -> Result<Vec<String>, String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("PDF parser panicked (malformed document)".to_string()),
    }
}

pub fn text_pages(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split(PAGE_BREAK)
        .map(String::from)
        .collect()
}

fn number_pages(texts: Vec<String>) -> Vec<RawPage> {
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let raw_text = if text.trim().is_empty() {
                debug!(page = i + 1, "no extractable text");
                None
            } else {
                Some(text)
            };
            RawPage {
                page_number: i + 1,
                raw_text,
            }
        })
        .collect()
}
