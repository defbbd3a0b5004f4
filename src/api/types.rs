//! Wire types for the VoiceUp REST API.
//!
//! Field names follow the API's camelCase JSON. Most fields default when
//! missing because older records do not carry every attribute.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::priority::Priority;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u32 = 50;

/// Successful responses wrap their payload as `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error responses carry `{"message": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// A citizen report as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_mobile: String,
    #[serde(default)]
    pub user_upload_images: Vec<String>,
    #[serde(default)]
    pub matching_posts: Vec<String>,
    #[serde(default, alias = "created_at")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievement: Option<AchievementRecord>,
}

impl Issue {
    /// Creation time, accepting RFC 3339 or RFC 2822 (`Tue, 01 Jul 2025 10:00:00 GMT`).
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date_created.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }

    /// `YYYY-MM-DD` of creation, or `"Unknown"`.
    pub fn posted_date(&self) -> String {
        self.created_at()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Image to show for this issue: the first upload, else a placeholder
    /// picked from `fallbacks` by the issue's position in its list.
    pub fn preview_image<'a>(&'a self, position: usize, fallbacks: &'a [String]) -> Option<&'a str> {
        self.user_upload_images
            .iter()
            .find(|img| !img.trim().is_empty())
            .or_else(|| {
                (!fallbacks.is_empty()).then(|| &fallbacks[position % fallbacks.len()])
            })
            .map(String::as_str)
    }

    /// Free-text summary of the recorded achievement, if any.
    pub fn achievement_summary(&self) -> Option<&str> {
        self.achievement.as_ref().map(AchievementRecord::summary)
    }
}

/// Response of `GET /issues/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueDetails {
    pub issue: Issue,
    #[serde(default)]
    pub matching_issues: Vec<Issue>,
}

/// Aggregate counters for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub pending_issues: u64,
    #[serde(default)]
    pub reported_issues: u64,
    #[serde(default)]
    pub verified: u64,
    #[serde(default)]
    pub on_hold: u64,
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub achievements: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_issues: Option<u64>,
}

/// Outcome of a meeting with officials about a resolved issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub government_official_name: String,
    pub designation: String,
    pub meeting_date: String,
    pub issue_status: String,
    pub action_taken: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_path: Option<String>,
}

/// Some records store a structured achievement, older ones a plain note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AchievementRecord {
    Detailed(Achievement),
    Note(String),
}

impl AchievementRecord {
    pub fn summary(&self) -> &str {
        match self {
            AchievementRecord::Detailed(a) => &a.action_taken,
            AchievementRecord::Note(note) => note,
        }
    }
}

/// Body of `POST /issues`: an issue without server-assigned fields.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub priority: Priority,
    pub user_name: String,
    pub user_mobile: String,
    pub user_upload_images: Vec<String>,
    pub matching_posts: Vec<String>,
}

/// Whole-body response of `POST /issues`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub issue_id: Option<String>,
}

/// Whole-body response of mutation endpoints that return no payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusChange<'a> {
    pub status: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AchievementChange<'a> {
    pub achievement: &'a Achievement,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Paging and filtering for `GET /issues`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    pub limit: u32,
    pub skip: u32,
    pub status: Option<String>,
}

impl Default for IssueQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: 0,
            status: None,
        }
    }
}

impl IssueQuery {
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("skip", self.skip.to_string()),
        ];
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(("status", status.to_string()));
        }
        params
    }
}
