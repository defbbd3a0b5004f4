use chrono::NaiveDate;
use serde_json::Value;

use crate::achievements::AchievementReport;
use crate::api::{
    Achievement, CreatedIssue, Credentials, DashboardStats, Issue, IssueDetails, IssueQuery,
    NewIssue, SignupRequest, VoiceUpClient,
};
use crate::config::VoiceUpConfig;
use crate::error::VoiceUpError;
use crate::progression::{ConfirmationPrompt, Progression, stage};

/// Decides whether a pending status change goes ahead.
pub trait Confirmer {
    fn confirm(&self, prompt: &ConfirmationPrompt) -> bool;
}

/// Confirms every prompt (`--yes`).
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &ConfirmationPrompt) -> bool {
        true
    }
}

/// Result of an `advance` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The update was sent. `current` is the status after re-fetching.
    Advanced {
        from: String,
        to: String,
        current: String,
    },
    /// The user declined the prompt.
    Cancelled { target: String },
    /// The requested target was not the next stage.
    Ignored { current: String },
}

/// Runs dashboard commands against the API.
pub struct Dashboard {
    client: VoiceUpClient,
    config: VoiceUpConfig,
    confirmer: Box<dyn Confirmer>,
}

impl Dashboard {
    pub fn new(client: VoiceUpClient, config: VoiceUpConfig, confirmer: Box<dyn Confirmer>) -> Self {
        Self {
            client,
            config,
            confirmer,
        }
    }

    pub fn config(&self) -> &VoiceUpConfig {
        &self.config
    }

    pub async fn stats(&self) -> Result<DashboardStats, VoiceUpError> {
        Ok(self.client.dashboard_stats().await?)
    }

    /// Lists issues, normalizing the status filter to its canonical stage name.
    pub async fn list(
        &self,
        status: Option<&str>,
        limit: Option<u32>,
        skip: u32,
    ) -> Result<Vec<Issue>, VoiceUpError> {
        let status = status.map(|s| stage::canonical_name(s).map_or_else(|| s.to_string(), str::to_string));
        let query = IssueQuery {
            limit: limit.unwrap_or(self.config.page_limit),
            skip,
            status,
        };
        tracing::debug!(?query, "listing issues");
        Ok(self.client.list_issues(&query).await?)
    }

    pub async fn reposted(&self, limit: Option<u32>, skip: u32) -> Result<Vec<Issue>, VoiceUpError> {
        let limit = limit.unwrap_or(self.config.page_limit);
        Ok(self.client.reposted_issues(limit, skip).await?)
    }

    pub async fn show(&self, issue_id: &str) -> Result<IssueDetails, VoiceUpError> {
        self.client
            .issue_details(issue_id)
            .await
            .map_err(|err| VoiceUpError::for_issue(issue_id, err))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Issue>, VoiceUpError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(VoiceUpError::Config("search query must not be empty".into()));
        }
        Ok(self.client.search_issues(query).await?)
    }

    pub async fn create(&self, issue: &NewIssue) -> Result<CreatedIssue, VoiceUpError> {
        let created = self.client.create_issue(issue).await?;
        tracing::info!(issue_id = ?created.issue_id, title = %issue.title, "issue created");
        Ok(created)
    }

    /// Moves an issue one stage forward, after confirmation.
    ///
    /// `target` names the stage to move to; `None` means the next stage.
    /// Any target other than the next stage is ignored.
    pub async fn advance(
        &self,
        issue_id: &str,
        target: Option<&str>,
    ) -> Result<AdvanceOutcome, VoiceUpError> {
        let details = self.show(issue_id).await?;
        let mut progression = Progression::new(details.issue.status.as_str());

        let target_stage = match target {
            Some(name) => stage::find_stage(name),
            None => stage::stage_at(progression.current_index() + 1),
        };
        if let Some(target_stage) = target_stage {
            progression.request_stage(target_stage);
        }
        let Some(prompt) = progression.prompt() else {
            return Ok(AdvanceOutcome::Ignored {
                current: progression.current_status().to_string(),
            });
        };

        if !self.confirmer.confirm(&prompt) {
            progression.cancel();
            tracing::info!(issue_id, target = %prompt.to, "status change cancelled");
            return Ok(AdvanceOutcome::Cancelled { target: prompt.to });
        }

        let client = &self.client;
        if let Some(update) =
            progression.confirm(|status: String| client.update_issue_status(issue_id, status))
        {
            let ack = update.await?;
            tracing::info!(issue_id, from = %prompt.from, to = %prompt.to, message = ?ack.message, "status updated");
        }

        let refreshed = self.show(issue_id).await?;
        progression.sync_status(refreshed.issue.status.as_str());

        Ok(AdvanceOutcome::Advanced {
            from: prompt.from,
            to: prompt.to,
            current: progression.current_status().to_string(),
        })
    }

    pub async fn record_achievement(
        &self,
        issue_id: &str,
        achievement: &Achievement,
    ) -> Result<Option<Value>, VoiceUpError> {
        self.client
            .update_achievement(issue_id, achievement)
            .await
            .map_err(|err| VoiceUpError::for_issue(issue_id, err))
    }

    /// Builds the achievements report from completed issues.
    pub async fn achievement_report(
        &self,
        generated_on: NaiveDate,
    ) -> Result<AchievementReport, VoiceUpError> {
        let completed = stage::stage_at(stage::last_index())
            .map(|s| s.name)
            .unwrap_or("Completed");
        let query = IssueQuery {
            limit: self.config.page_limit,
            skip: 0,
            status: Some(completed.to_string()),
        };
        let issues = self.client.list_issues(&query).await?;
        Ok(AchievementReport::from_issues(&issues, generated_on))
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Value, VoiceUpError> {
        Ok(self.client.login(credentials).await?)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Value, VoiceUpError> {
        Ok(self.client.signup(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answers every prompt the same way and remembers what was asked.
    struct Scripted {
        answer: bool,
        asked: Rc<RefCell<Vec<String>>>,
    }

    impl Confirmer for Scripted {
        fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
            self.asked.borrow_mut().push(prompt.to_string());
            self.answer
        }
    }

    fn dashboard(server: &MockServer, answer: bool) -> (Dashboard, Rc<RefCell<Vec<String>>>) {
        let asked = Rc::new(RefCell::new(Vec::new()));
        let client = VoiceUpClient::new(server.uri()).unwrap();
        let confirmer = Scripted {
            answer,
            asked: Rc::clone(&asked),
        };
        (
            Dashboard::new(client, VoiceUpConfig::default(), Box::new(confirmer)),
            asked,
        )
    }

    fn issue_body(id: &str, status: &str) -> Value {
        json!({"data": {"issue": {"_id": id, "title": "Pothole", "status": status}, "matching_issues": []}})
    }

    async fn mount_issue(server: &MockServer, id: &str, status: &str, times: Option<u64>) {
        let mock = Mock::given(method("GET"))
            .and(path(format!("/issues/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_body(id, status)));
        match times {
            Some(n) => mock.up_to_n_times(n).mount(server).await,
            None => mock.mount(server).await,
        }
    }

    async fn expect_status_puts(server: &MockServer, id: &str, status: &str, times: u64) {
        Mock::given(method("PUT"))
            .and(path(format!("/issues/{id}/status")))
            .and(body_json(json!({"status": status})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Issue status updated successfully"
            })))
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn advance_confirms_and_refreshes() {
        let server = MockServer::start().await;
        mount_issue(&server, "abc", "Seen", Some(1)).await;
        mount_issue(&server, "abc", "Verified", None).await;
        expect_status_puts(&server, "abc", "Verified", 1).await;

        let (dash, asked) = dashboard(&server, true);
        let outcome = dash.advance("abc", None).await.unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Advanced {
                from: "Seen".into(),
                to: "Verified".into(),
                current: "Verified".into(),
            }
        );
        assert_eq!(
            asked.borrow().as_slice(),
            ["Are you confirming that you change the progress from \"Seen\" to \"Verified\""]
        );
    }

    #[tokio::test]
    async fn declined_prompt_sends_nothing() {
        let server = MockServer::start().await;
        mount_issue(&server, "abc", "In Progress", None).await;
        expect_status_puts(&server, "abc", "On Hold", 0).await;

        let (dash, asked) = dashboard(&server, false);
        let outcome = dash.advance("abc", None).await.unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Cancelled {
                target: "On Hold".into()
            }
        );
        assert_eq!(asked.borrow().len(), 1);
    }

    #[tokio::test]
    async fn skipping_ahead_is_ignored_without_prompt() {
        let server = MockServer::start().await;
        mount_issue(&server, "abc", "Verified", None).await;
        expect_status_puts(&server, "abc", "Completed", 0).await;

        let (dash, asked) = dashboard(&server, true);
        let outcome = dash.advance("abc", Some("Completed")).await.unwrap();

        assert_eq!(
            outcome,
            AdvanceOutcome::Ignored {
                current: "Verified".into()
            }
        );
        assert!(asked.borrow().is_empty());
    }

    #[tokio::test]
    async fn explicit_next_target_uses_canonical_name() {
        let server = MockServer::start().await;
        mount_issue(&server, "abc", "In Progress", Some(1)).await;
        mount_issue(&server, "abc", "On Hold", None).await;
        expect_status_puts(&server, "abc", "On Hold", 1).await;

        let (dash, _) = dashboard(&server, true);
        let outcome = dash.advance("abc", Some("on hold")).await.unwrap();
        assert!(matches!(outcome, AdvanceOutcome::Advanced { ref to, .. } if to == "On Hold"));
    }

    #[tokio::test]
    async fn final_stage_cannot_advance() {
        let server = MockServer::start().await;
        mount_issue(&server, "done", "Completed", None).await;

        let (dash, asked) = dashboard(&server, true);
        let outcome = dash.advance("done", None).await.unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Ignored {
                current: "Completed".into()
            }
        );
        assert!(asked.borrow().is_empty());
    }

    #[tokio::test]
    async fn failed_update_surfaces_api_error() {
        let server = MockServer::start().await;
        mount_issue(&server, "abc", "Seen", None).await;
        Mock::given(method("PUT"))
            .and(path("/issues/abc/status"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Token is missing!"})),
            )
            .mount(&server)
            .await;

        let (dash, _) = dashboard(&server, true);
        let err = dash.advance("abc", None).await.unwrap_err();
        assert_eq!(err.to_string(), "API error (status 401): Token is missing!");
    }

    #[tokio::test]
    async fn unknown_issue_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Issue not found"})))
            .mount(&server)
            .await;

        let (dash, _) = dashboard(&server, true);
        let err = dash.advance("nope", None).await.unwrap_err();
        assert!(matches!(err, VoiceUpError::IssueNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn list_normalizes_status_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues"))
            .and(query_param("status", "On Hold"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let (dash, _) = dashboard(&server, true);
        let issues = dash.list(Some("On hold"), None, 0).await.unwrap();
        assert!(issues.is_empty());
    }

    #[tokio::test]
    async fn blank_search_is_rejected_locally() {
        let server = MockServer::start().await;
        let (dash, _) = dashboard(&server, true);
        assert!(matches!(
            dash.search("   ").await,
            Err(VoiceUpError::Config(_))
        ));
    }

    #[tokio::test]
    async fn achievement_report_uses_completed_issues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues"))
            .and(query_param("status", "Completed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"_id": "1", "description": "Road crack", "location": "Colombo 05",
                 "status": "Completed", "dateCreated": "2025-07-28T00:00:00Z"}
            ]})))
            .mount(&server)
            .await;

        let (dash, _) = dashboard(&server, true);
        let day = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
        let report = dash.achievement_report(day).await.unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].posted_date, "2025-07-28");
    }
}
