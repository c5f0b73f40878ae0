//! Client-side upload helpers
//!
//! - PDF / size validation before anything is sent
//! - Human-readable file sizes
//! - Simulated progress: the backend reports no transfer progress, so a timer
//!   advances the bar and the response snaps it to 100%

use crate::error::UploadError;
use std::time::Duration;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Default upload limit, matching the backend's MAX_FILE_SIZE
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Interval between simulated progress steps
pub const PROGRESS_TICK: Duration = Duration::from_millis(200);

/// How long a finished bar stays visible before it is cleared
pub const PROGRESS_LINGER: Duration = Duration::from_millis(500);

const PROGRESS_STEP: u8 = 10;
const PROGRESS_CEILING: u8 = 90;

/// Detect a PDF from its magic bytes
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"%PDF") {
        return Some(PDF_CONTENT_TYPE);
    }
    None
}

/// Accepts a file when either its content type or its extension says PDF, and
/// it fits in `max_bytes`
pub fn validate_file(
    name: &str,
    content_type: Option<&str>,
    size: u64,
    max_bytes: u64,
) -> Result<(), UploadError> {
    let is_pdf = content_type == Some(PDF_CONTENT_TYPE)
        || name.to_lowercase().ends_with(".pdf");
    if !is_pdf {
        return Err(UploadError::NotPdf);
    }

    if size > max_bytes {
        return Err(UploadError::TooLarge { max_mb: max_bytes / (1024 * 1024) });
    }

    Ok(())
}

/// "0 Bytes", "512 Bytes", "1.5 KB", "2.25 MB"
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Percentage shown while an upload is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    percent: u8,
}

impl UploadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// One timer step: +10 until 90, then hold
    pub fn tick(&mut self) -> u8 {
        if self.percent < PROGRESS_CEILING {
            self.percent = (self.percent + PROGRESS_STEP).min(PROGRESS_CEILING);
        }
        self.percent
    }

    pub fn complete(&mut self) {
        self.percent = 100;
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }

    /// True while the bar should be drawn as "uploading"
    pub fn is_running(&self) -> bool {
        self.percent > 0 && self.percent < 100
    }

    pub fn is_complete(&self) -> bool {
        self.percent == 100
    }

    /// `[#####.....]  50%` with `width` cells
    pub fn render_bar(&self, width: usize) -> String {
        let filled = width * self.percent as usize / 100;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            ".".repeat(width - filled),
            self.percent
        )
    }
}
