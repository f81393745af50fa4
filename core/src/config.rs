//! Configuration for talking to the collection API.
//!
//! Values come from, in increasing precedence: built-in defaults, a TOML
//! file, environment variables, and explicit overrides (CLI flags).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::client::{CollectionClient, DEFAULT_CULTURE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const DEFAULT_BASE_URL: &str = "https://www.rijksmuseum.nl/api/en";
/// Public demo key of the collection API.
pub const DEFAULT_API_KEY: &str = "0fiuZFh4";

pub const API_KEY_ENV: &str = "GALLERY_API_KEY";
pub const BASE_URL_ENV: &str = "GALLERY_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub culture: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            culture: DEFAULT_CULTURE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `GALLERY_API_KEY` / `GALLERY_BASE_URL` as looked up by `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(api_key) = var(API_KEY_ENV) {
            self.api_key = api_key;
        }
        if let Some(base_url) = var(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        self
    }

    pub fn with_overrides(mut self, api_key: Option<String>, base_url: Option<String>) -> Self {
        if let Some(api_key) = api_key {
            self.api_key = api_key;
        }
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid("api_key must not be empty".to_string()));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url '{}' must use http or https",
                self.base_url
            )));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.culture.trim().is_empty() {
            return Err(ConfigError::Invalid("culture must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client(&self) -> CollectionClient {
        CollectionClient::new(&self.base_url, &self.api_key).with_culture(&self.culture)
    }
}
