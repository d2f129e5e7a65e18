use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page as handed over by the extractor. `raw_text` is `None` for pages
/// with no extractable text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub page_number: usize,
    pub raw_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedPage {
    #[serde(rename = "page_num")]
    pub page_number: usize,
    pub content: String,
    pub headings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDocument {
    pub title: String,
    pub pages: Vec<CleanedPage>,
    pub all_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePoint {
    pub heading: String,
    pub point: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNotes {
    #[serde(rename = "page")]
    pub page_number: usize,
    #[serde(rename = "content")]
    pub points: Vec<NotePoint>,
}

/// Final record produced for one ingested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub notes: Vec<PageNotes>,
    pub all_text: String,
    pub pages: Vec<CleanedPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: String,
    pub ingested_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: Analysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub id: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_use_original_wire_names() {
        let page = CleanedPage {
            page_number: 2,
            content: "Intro".to_string(),
            headings: vec!["Intro".to_string()],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["page_num"], 2);
        assert_eq!(json["headings"][0], "Intro");
    }

    #[test]
    fn notes_use_original_wire_names() {
        let notes = PageNotes {
            page_number: 3,
            points: vec![NotePoint {
                heading: "Key Discussion".into(),
                point: "- a point".into(),
            }],
        };
        let json = serde_json::to_value(&notes).unwrap();
        assert_eq!(json["page"], 3);
        assert_eq!(json["content"][0]["heading"], "Key Discussion");
    }
}
