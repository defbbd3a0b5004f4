//! VoiceUp configuration loaded from `voiceup.toml`.
//!
//! [`VoiceUpConfig`] holds every tunable. Values missing from the file use
//! defaults. `VOICEUP_API_URL` and `VOICEUP_API_TOKEN` take precedence over
//! the file; command-line flags take precedence over both.

use std::path::Path;

use serde::Deserialize;

use crate::error::VoiceUpError;

pub const CONFIG_FILE: &str = "voiceup.toml";

/// Top-level configuration loaded from `voiceup.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceUpConfig {
    /// Root of the REST API, e.g. `http://localhost:5000/api`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token for mutating endpoints.
    #[serde(default)]
    pub api_token: Option<String>,

    /// Page size for list commands.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Images shown for issues that have no upload, cycled by list position.
    #[serde(default)]
    pub placeholder_images: Vec<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_page_limit() -> u32 {
    crate::api::types::DEFAULT_LIMIT
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for VoiceUpConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_token: None,
            page_limit: default_page_limit(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            placeholder_images: Vec::new(),
        }
    }
}

impl VoiceUpConfig {
    /// Loads `voiceup.toml` from the current directory, then applies the
    /// environment overrides.
    pub fn load() -> Result<Self, VoiceUpError> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;
        config.apply_env(
            std::env::var("VOICEUP_API_URL").ok(),
            std::env::var("VOICEUP_API_TOKEN").ok(),
        );
        Ok(config)
    }

    /// Reads the given file, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, VoiceUpError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str::<VoiceUpConfig>(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_url
            && !url.is_empty()
        {
            self.api_base_url = url;
        }
        if let Some(token) = token
            && !token.is_empty()
        {
            self.api_token = Some(token);
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, api_url: Option<String>, token: Option<String>) -> Self {
        self.apply_env(api_url, token);
        self
    }

    fn validate(&self) -> Result<(), VoiceUpError> {
        if self.api_base_url.trim().is_empty() {
            return Err(VoiceUpError::Config("api_base_url must not be empty".into()));
        }
        if self.page_limit == 0 {
            return Err(VoiceUpError::Config("page_limit must be at least 1".into()));
        }
        Ok(())
    }
}
