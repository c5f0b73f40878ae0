use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Status the client assigns to every document it has a summary response for
pub const STATUS_COMPLETED: &str = "completed";

/// Keyword/frequency pair returned when no AI summary could be produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

/// Response of `POST /upload-resume`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub fallback_words: Option<Vec<WordCount>>,
    pub status: String,
}

/// One row of `GET /insights`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentItem {
    pub id: i64,
    pub filename: String,
    #[serde(default)]
    pub ai_summary: Option<String>,
    pub upload_date: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub file_size: u64,
}

/// Response of `GET /insights`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightsResponse {
    pub documents: Vec<DocumentItem>,
    pub total: u64,
}

/// Response of `DELETE /documents/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub status: String,
    pub id: i64,
}

/// A document as the client displays it, whichever endpoint it came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub original_name: String,
    pub ai_summary: Option<String>,
    pub fallback_words: Option<Vec<WordCount>>,
    pub upload_date: String,
    pub file_size: u64,
    pub processing_status: String,
}

impl Document {
    /// Shape a fresh upload response. The backend does not echo size or date,
    /// so the local file size and the current time are used.
    pub fn from_upload(raw: UploadResponse, file_size: u64) -> Self {
        Self {
            id: raw.id,
            original_name: raw.filename.clone(),
            filename: raw.filename,
            ai_summary: raw.ai_summary,
            fallback_words: raw.fallback_words,
            upload_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            file_size,
            processing_status: STATUS_COMPLETED.to_string(),
        }
    }

    pub fn from_item(item: DocumentItem) -> Self {
        Self {
            id: item.id,
            original_name: item.filename.clone(),
            filename: item.filename,
            ai_summary: item.ai_summary,
            fallback_words: None,
            upload_date: item.upload_date,
            file_size: item.file_size,
            processing_status: STATUS_COMPLETED.to_string(),
        }
    }

    /// Size chip shown next to the filename, e.g. "12.5 KB"
    pub fn size_kb_label(&self) -> String {
        format!("{:.1} KB", self.file_size as f64 / 1024.0)
    }
}

impl From<DocumentItem> for Document {
    fn from(item: DocumentItem) -> Self {
        Document::from_item(item)
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_without_summary() {
        let json = r#"{"id": 7, "filename": "cv.pdf", "ai_summary": null,
            "fallback_words": [{"word": "rust", "count": 4}], "status": "success"}"#;
        let raw: UploadResponse = serde_json::from_str(json).unwrap();

        assert_eq!(raw.ai_summary, None);
        assert_eq!(raw.fallback_words.as_ref().unwrap()[0], WordCount { word: "rust".into(), count: 4 });

        let doc = Document::from_upload(raw, 2048);
        assert_eq!(doc.original_name, "cv.pdf");
        assert_eq!(doc.file_size, 2048);
        assert_eq!(doc.processing_status, "completed");
        assert!(doc.upload_date.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&doc.upload_date).is_ok());
    }

    #[test]
    fn test_insights_response_missing_fields() {
        let json = r#"{"documents": [
            {"id": 2, "filename": "b.pdf", "upload_date": "2025-03-01 10:00:00", "file_size": null},
            {"id": 1, "filename": "a.pdf", "ai_summary": "Strengths\n- x", "upload_date": "2025-02-01 09:00:00", "file_size": 1536}
        ], "total": 12}"#;
        let resp: InsightsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.total, 12);
        assert_eq!(resp.documents[0].file_size, 0);
        assert_eq!(resp.documents[0].ai_summary, None);

        let doc: Document = resp.documents[1].clone().into();
        assert_eq!(doc.fallback_words, None);
        assert_eq!(doc.original_name, "a.pdf");
        assert_eq!(doc.size_kb_label(), "1.5 KB");
    }

    #[test]
    fn test_file_size_field_absent() {
        let json = r#"{"id": 3, "filename": "c.pdf", "upload_date": "2025-01-01 00:00:00"}"#;
        let item: DocumentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.file_size, 0);
    }

    #[test]
    fn test_size_label_rounding() {
        let mut doc = Document::from_item(DocumentItem {
            id: 1,
            filename: "x.pdf".into(),
            ai_summary: None,
            upload_date: String::new(),
            file_size: 0,
        });
        assert_eq!(doc.size_kb_label(), "0.0 KB");
        doc.file_size = 10 * 1024 * 1024;
        assert_eq!(doc.size_kb_label(), "10240.0 KB");
    }
}
