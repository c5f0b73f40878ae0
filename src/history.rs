//! Upload history: offset/limit paging over `GET /insights` and the table view

use crate::models::{Document, InsightsResponse};
use crate::upload::format_file_size;
use crate::utils::safe_truncate;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

const FILENAME_WIDTH: usize = 40;

/// Zero-based page cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pager {
    fn default() -> Self {
        Self { page: 0, limit: DEFAULT_PAGE_SIZE }
    }
}

impl Pager {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit: limit.max(1) }
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.limit as u64
    }

    /// Never less than 1, so an empty history still shows "Page 1 / 1"
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, total: u64) -> bool {
        (self.page as u64 + 1) < self.total_pages(total)
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn next(&mut self, total: u64) {
        if self.has_next(total) {
            self.page += 1;
        }
    }

    pub fn label(&self, total: u64) -> String {
        format!("Page {} / {}", self.page + 1, self.total_pages(total))
    }
}

/// One fetched page of history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryPage {
    pub items: Vec<Document>,
    pub total: u64,
}

impl HistoryPage {
    pub fn from_response(resp: InsightsResponse) -> Self {
        Self {
            items: resp.documents.into_iter().map(Document::from_item).collect(),
            total: resp.total,
        }
    }

    pub fn find(&self, id: i64) -> Option<&Document> {
        self.items.iter().find(|d| d.id == id)
    }

    /// Apply a confirmed delete locally without refetching
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|d| d.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.total = self.total.saturating_sub(1);
        }
        removed
    }
}

/// SQLite timestamps come back as "YYYY-MM-DD HH:MM:SS" in UTC; fresh uploads
/// carry RFC 3339. Anything else is shown as-is.
pub fn format_upload_date(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&naive).with_timezone(&Local).format(DISPLAY).to_string();
    }
    raw.to_string()
}

pub fn render_table(page: &HistoryPage, pager: &Pager) -> String {
    let mut out = format!("Uploads ({} total)\n", page.total);

    if page.items.is_empty() {
        out.push_str("No documents yet\n");
    } else {
        out.push_str(&format!(
            "{:>6}  {:<width$}  {:<16}  {:>10}\n",
            "ID", "Filename", "Uploaded", "Size",
            width = FILENAME_WIDTH
        ));
        for doc in &page.items {
            out.push_str(&format!(
                "{:>6}  {:<width$}  {:<16}  {:>10}\n",
                doc.id,
                safe_truncate(&doc.filename, FILENAME_WIDTH),
                format_upload_date(&doc.upload_date),
                format_file_size(doc.file_size),
                width = FILENAME_WIDTH
            ));
        }
    }

    out.push_str(&pager.label(page.total));
    out
}
