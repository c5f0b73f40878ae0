//! Application settings storage
//!
//! Stores the backend URL and client limits in a JSON file in the config directory.

use crate::error::SettingsError;
use crate::history::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

/// Global settings instance
static SETTINGS: RwLock<Option<Settings>> = RwLock::new(None);

/// Path to config file (set during init)
static CONFIG_PATH: RwLock<Option<PathBuf>> = RwLock::new(None);

pub const API_BASE_ENV: &str = "DOCINSIGHT_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upload limit in MiB (backend default is 10)
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_upload_mb() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60 // extraction + summarisation can take a while
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
            max_upload_mb: default_max_upload_mb(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Settings {
    /// Load settings from disk or create default
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Settings::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
                Settings::default()
            }),
            Err(e) => {
                log::warn!("Failed to read settings {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// An env value wins over the stored one unless it is empty
pub fn resolve_api_base(env_value: Option<String>, stored: &str) -> String {
    match env_value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => stored.to_string(),
    }
}

/// Only absolute http(s) URLs make sense as a backend base
pub fn validate_api_base(raw: &str) -> Result<String, SettingsError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|_| SettingsError::InvalidUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(SettingsError::InvalidUrl(raw.to_string()));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Initialize settings with the config directory
pub fn init(config_dir: PathBuf) {
    let config_path = config_dir.join("settings.json");
    let settings = Settings::load(&config_path);
    log::debug!("Settings loaded from {}", config_path.display());

    if let Ok(mut guard) = CONFIG_PATH.write() {
        *guard = Some(config_path);
    }
    if let Ok(mut guard) = SETTINGS.write() {
        *guard = Some(settings);
    }
}

/// Default location: `<config dir>/docinsight`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("docinsight"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Snapshot of the current settings (defaults if `init` was never called)
pub fn current() -> Settings {
    SETTINGS.read()
        .ok()
        .and_then(|g| g.clone())
        .unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    CONFIG_PATH.read().ok().and_then(|g| g.clone())
}

/// Backend base URL (checks env var first, then stored setting)
pub fn get_api_base() -> String {
    resolve_api_base(std::env::var(API_BASE_ENV).ok(), &current().api_base)
}

pub fn get_page_size() -> u32 {
    current().page_size
}

pub fn get_max_upload_bytes() -> u64 {
    current().max_upload_bytes()
}

pub fn get_request_timeout() -> Duration {
    Duration::from_secs(current().request_timeout_secs)
}

fn update<F>(apply: F) -> Result<(), SettingsError>
where
    F: FnOnce(&mut Settings),
{
    let config_path = config_path().ok_or(SettingsError::NotInitialized)?;

    let mut settings_guard = SETTINGS.write().map_err(|_| SettingsError::Lock)?;
    let mut next = settings_guard.clone().unwrap_or_default();
    apply(&mut next);

    // Memory only changes once the file is written
    next.save(&config_path)?;
    *settings_guard = Some(next);
    Ok(())
}

/// Set and save the backend base URL
pub fn set_api_base(raw: &str) -> Result<String, SettingsError> {
    let api_base = validate_api_base(raw)?;
    let stored = api_base.clone();
    update(move |s| s.api_base = stored)?;
    log::info!("API base saved to settings: {}", api_base);
    Ok(api_base)
}

/// Set and save the history page size
pub fn set_page_size(page_size: u32) -> Result<(), SettingsError> {
    if page_size == 0 {
        return Err(SettingsError::InvalidValue {
            field: "page_size",
            reason: "must be at least 1".to_string(),
        });
    }
    update(|s| s.page_size = page_size)
}
