use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::UserDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{BACKEND_URL_ENV, CONFIG_DIR, CONFIG_FILE, DEFAULT_BACKEND_URL};
use crate::external_api::ApiError;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend origin, without trailing slash
    pub backend_url: String,
    /// Request timeout, the http client default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn new(backend_url: &str, request_timeout_secs: Option<u64>) -> Result<Self, ApiError> {
        Ok(Self {
            backend_url: validate_url(backend_url)?,
            request_timeout_secs,
        })
    }

    /// Path to `~/.config/vtm/config.json`
    pub fn default_path() -> Result<PathBuf, ApiError> {
        UserDirs::new()
            .ok_or(ApiError::NotFoundUserDir)
            .map(|user_dirs| user_dirs.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Read config from file, defaults when there is no file.
    /// `VTM_BACKEND_URL` wins over the file value.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        Self::load_with_override(path, env::var(BACKEND_URL_ENV).ok())
    }

    fn load_with_override(path: &Path, backend_url: Option<String>) -> Result<Self, ApiError> {
        let mut config = if path.exists() {
            let data = fs::read(path)?;
            serde_json::from_slice::<Self>(&data)?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        if let Some(url) = backend_url {
            config.backend_url = url;
        }
        config.backend_url = validate_url(&config.backend_url)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ApiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Entered string must be a URL
pub fn validate_url(value: &str) -> Result<String, ApiError> {
    let regex = Regex::new(r"^https?://.+$").map_err(|e| ApiError::Parse(e.to_string()))?;
    let value = value.trim();
    if !regex.is_match(value) {
        return Err(ApiError::InvalidUrl);
    }
    Ok(value.trim_end_matches('/').to_string())
}
