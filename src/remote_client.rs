//! Client for the document-insight backend.
//!
//! Endpoints:
//! - POST /upload-resume (multipart, field `file`)
//! - GET /insights?limit=&offset=
//! - DELETE /documents/{id}
//!
//! Errors come back FastAPI-style as `{"detail": "..."}`.

use crate::error::ApiError;
use crate::models::{DeleteResponse, Document, InsightsResponse, UploadResponse};
use crate::upload::{sniff_content_type, validate_file, PDF_CONTENT_TYPE};
use crate::utils::file_name_of;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("docinsight/", env!("CARGO_PKG_VERSION"));

/// Length of the `%PDF` magic
const SNIFF_LEN: u64 = 4;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_client(base_url, client)
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, ...)
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        url::Url::parse(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Raw upload of a file already on disk
    pub async fn upload_resume(&self, path: &Path) -> Result<UploadResponse, ApiError> {
        let bytes = read_file(path)?;
        self.upload_bytes(&file_name_of(path), bytes).await
    }

    async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint("/upload-resume");
        log::debug!("POST {} ({} bytes)", url, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_CONTENT_TYPE)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Validate, upload and shape the response into a displayable document
    pub async fn upload_document(&self, path: &Path, max_bytes: u64) -> Result<Document, ApiError> {
        let name = file_name_of(path);
        let size = std::fs::metadata(path).map_err(|source| io_error(path, source))?.len();

        // Reject on metadata and magic bytes before loading the file
        validate_file(&name, sniff_content_type(&read_head(path)?), size, max_bytes)?;

        let bytes = read_file(path)?;
        let size = bytes.len() as u64;
        let raw = self.upload_bytes(&name, bytes).await?;
        log::info!("Uploaded {} as document {} ({})", name, raw.id, raw.status);
        Ok(Document::from_upload(raw, size))
    }

    pub async fn fetch_insights(&self, limit: u32, offset: u64) -> Result<InsightsResponse, ApiError> {
        let url = self.endpoint("/insights");
        log::debug!("GET {} limit={} offset={}", url, limit, offset);

        let response = self.client
            .get(&url)
            .query(&[("limit", limit as u64), ("offset", offset)])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn delete_document(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        let url = self.endpoint(&format!("/documents/{}", id));
        log::debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ApiError {
    ApiError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ApiError> {
    std::fs::read(path).map_err(|source| io_error(path, source))
}

/// First bytes of a file, enough for `sniff_content_type`
fn read_head(path: &Path) -> Result<Vec<u8>, ApiError> {
    let file = std::fs::File::open(path).map_err(|source| io_error(path, source))?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut head)
        .map_err(|source| io_error(path, source))?;
    Ok(head)
}

/// Pass 2xx through; turn anything else into `Rejected` (string detail) or `Status`
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::warn!("Backend returned {}: {}", status, body);

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { detail: Some(serde_json::Value::String(detail)) }) => {
            Err(ApiError::Rejected { status, detail })
        }
        _ => Err(ApiError::Status(status)),
    }
}
