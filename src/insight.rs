//! Chooses what to show for a document: parsed summary sections, the keyword
//! fallback, or nothing

use crate::models::{Document, WordCount};
use crate::sections::{parse_sections, render_sections, Section};

pub const NO_INSIGHTS: &str = "No insights available.";

#[derive(Debug, Clone, PartialEq)]
pub enum InsightView {
    Sections(Vec<Section>),
    Keywords(Vec<WordCount>),
    Empty,
}

impl InsightView {
    /// Sections win whenever the summary yields any; keywords are the fallback
    pub fn for_document(doc: &Document) -> Self {
        let sections = parse_sections(doc.ai_summary.as_deref());
        if !sections.is_empty() {
            return InsightView::Sections(sections);
        }

        match &doc.fallback_words {
            Some(words) if !words.is_empty() => InsightView::Keywords(words.clone()),
            _ => InsightView::Empty,
        }
    }

    pub fn render(&self) -> String {
        match self {
            InsightView::Sections(sections) => render_sections(sections),
            InsightView::Keywords(words) => {
                let mut out = String::from("Top keywords");
                for w in words {
                    out.push_str(&format!("\n- {} ({})", w.word, w.count));
                }
                out
            }
            InsightView::Empty => NO_INSIGHTS.to_string(),
        }
    }
}

/// Full text view of a document's insights, header line included
pub fn render_document(doc: &Document) -> String {
    format!(
        "Insights  [{}]  {}\n\n{}",
        doc.size_kb_label(),
        doc.filename,
        InsightView::for_document(doc).render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentItem;

    fn doc(summary: Option<&str>, words: Option<Vec<(&str, u32)>>) -> Document {
        let mut d = Document::from_item(DocumentItem {
            id: 1,
            filename: "report.pdf".to_string(),
            ai_summary: summary.map(String::from),
            upload_date: "2025-01-01 00:00:00".to_string(),
            file_size: 3072,
        });
        d.fallback_words = words.map(|ws| {
            ws.into_iter().map(|(w, c)| WordCount { word: w.to_string(), count: c }).collect()
        });
        d
    }

    #[test]
    fn test_sections_preferred_over_keywords() {
        let d = doc(Some("Strengths\n- Rust"), Some(vec![("rust", 3)]));
        match InsightView::for_document(&d) {
            InsightView::Sections(s) => assert_eq!(s[0].title, "Strengths"),
            other => panic!("expected sections, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_summary_falls_back_to_keywords() {
        let d = doc(Some("\n  \n"), Some(vec![("python", 5), ("data", 2)]));
        let view = InsightView::for_document(&d);
        assert_eq!(view.render(), "Top keywords\n- python (5)\n- data (2)");
    }

    #[test]
    fn test_empty_keywords_is_empty_view() {
        let d = doc(None, Some(vec![]));
        assert_eq!(InsightView::for_document(&d), InsightView::Empty);
        assert_eq!(InsightView::Empty.render(), NO_INSIGHTS);
    }

    #[test]
    fn test_render_document_header() {
        let d = doc(Some("Just one paragraph."), None);
        assert_eq!(
            render_document(&d),
            "Insights  [3.0 KB]  report.pdf\n\n## Summary\nJust one paragraph."
        );
    }
}
