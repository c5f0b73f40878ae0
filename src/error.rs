//! Error types for the client side. Upload validation, backend calls and
//! settings each get their own enum.

use reqwest::StatusCode;
use std::path::PathBuf;

/// Fallback message when the backend gave no usable `detail`
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Client-side rejection of a file before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Please select a PDF file only")]
    NotPdf,

    #[error("File size must be less than {max_mb}MB")]
    TooLarge { max_mb: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response carrying a FastAPI `{"detail": "..."}` body
    #[error("{detail} (HTTP {status})")]
    Rejected { status: StatusCode, detail: String },

    #[error("Backend returned status {0}")]
    Status(StatusCode),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Invalid(#[from] UploadError),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message suitable for an end user: the backend's own reason when there is
    /// one, a generic failure otherwise
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { detail, .. } => detail.clone(),
            ApiError::Invalid(e) => e.to_string(),
            _ => UPLOAD_FAILED.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::Status(status) => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid API base URL '{0}': must be http or https")]
    InvalidUrl(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Settings not initialized")]
    NotInitialized,

    #[error("Failed to acquire settings lock")]
    Lock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            detail: "Only PDF files are supported".to_string(),
        };
        assert_eq!(err.user_message(), "Only PDF files are supported");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_user_message_generic() {
        let err = ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), UPLOAD_FAILED);
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err: ApiError = UploadError::TooLarge { max_mb: 10 }.into();
        assert_eq!(err.to_string(), "File size must be less than 10MB");
        assert_eq!(err.user_message(), "File size must be less than 10MB");
    }
}
