use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum VoiceUpError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl VoiceUpError {
    /// Maps a 404 from the API onto [`VoiceUpError::IssueNotFound`].
    pub fn for_issue(issue_id: &str, err: ApiError) -> Self {
        if err.is_not_found() {
            VoiceUpError::IssueNotFound(issue_id.to_string())
        } else {
            VoiceUpError::Api(err)
        }
    }
}
