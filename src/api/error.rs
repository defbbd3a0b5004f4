//! Errors raised by [`VoiceUpClient`](super::VoiceUpClient).
//!
//! A request fails in one of two ways: the server answered with a non-success
//! status, or no usable answer arrived at all. Neither is retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server responded with a non-2xx status.
    ///
    /// `message` is the server's `{"message": ...}` text when the body carried
    /// one, otherwise `HTTP error! status: <code>`.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The request could not complete: DNS, refused connection, timeout, or a
    /// success body that was not the JSON we expected.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured base URL cannot have paths appended to it. Raised only
    /// when the client is built, never by a request.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    pub(crate) fn from_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {status}"));
        ApiError::Api { status, message }
    }

    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            ApiError::InvalidBaseUrl(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
