pub mod client;
pub mod error;
pub mod types;

pub use client::VoiceUpClient;
pub use error::ApiError;
pub use types::{
    Achievement, AchievementRecord, Ack, CreatedIssue, Credentials, DashboardStats, Issue,
    IssueDetails, IssueQuery, NewIssue, SignupRequest,
};
