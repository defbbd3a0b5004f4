use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::types::{
    Achievement, AchievementChange, Ack, CreatedIssue, Credentials, DashboardStats, Envelope,
    ErrorBody, Issue, IssueDetails, IssueQuery, NewIssue, SignupRequest, StatusChange,
};
use crate::config::VoiceUpConfig;

/// Stateless request/response wrapper over the VoiceUp REST API.
///
/// Each call is a single round trip: no retries, no caching.
#[derive(Debug, Clone)]
pub struct VoiceUpClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl VoiceUpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeouts(base_url, Duration::from_secs(10), Duration::from_secs(30))
    }

    /// Client with the configured timeouts and token.
    pub fn from_config(config: &VoiceUpConfig) -> Result<Self, ApiError> {
        let client = Self::with_timeouts(
            config.api_base_url.clone(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(client.with_token(config.api_token.clone()))
    }

    pub fn with_timeouts(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()?;
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidBaseUrl(raw.clone()))?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Bearer token sent with every request. Empty tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Parsed base URL. A bare host keeps its root `/`.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path, percent-encoding each one so an
    /// id containing `/`, `?` or `#` stays a single path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Cannot fail: the base was checked to have a path at construction.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and decodes a success body as `T`.
    ///
    /// Non-2xx responses become [`ApiError::Api`] carrying the server's
    /// message when the body has one.
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .inspect_err(|err| tracing::error!(endpoint, error = %err, "API request failed"))?;

        let status = response.status();
        tracing::debug!(endpoint, status = status.as_u16(), "API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            let err = ApiError::from_status(status.as_u16(), message);
            tracing::error!(endpoint, error = %err, "API request failed");
            return Err(err);
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(segments);
        let builder = self.client.get(url.clone()).query(query);
        let envelope: Envelope<T> = self.send(url.path(), builder).await?;
        Ok(envelope.data)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_data(&["stats"], &[]).await
    }

    pub async fn list_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>, ApiError> {
        self.get_data(&["issues"], &query.params()).await
    }

    pub async fn reposted_issues(&self, limit: u32, skip: u32) -> Result<Vec<Issue>, ApiError> {
        let params = [("limit", limit.to_string()), ("skip", skip.to_string())];
        self.get_data(&["issues", "reposted"], &params).await
    }

    pub async fn issue_details(&self, issue_id: &str) -> Result<IssueDetails, ApiError> {
        self.get_data(&["issues", issue_id], &[]).await
    }

    pub async fn search_issues(&self, query: &str) -> Result<Vec<Issue>, ApiError> {
        self.get_data(&["issues", "search"], &[("q", query.to_string())])
            .await
    }

    pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, ApiError> {
        let builder = self.client.post(self.url(&["issues"])).json(issue);
        self.send("/issues", builder).await
    }

    pub async fn update_issue_status(&self, issue_id: &str, status: String) -> Result<Ack, ApiError> {
        let url = self.url(&["issues", issue_id, "status"]);
        let endpoint = url.path().to_string();
        let builder = self
            .client
            .put(url)
            .json(&StatusChange { status: &status });
        self.send(&endpoint, builder).await
    }

    /// Returns the response's `data`, which the API may omit.
    pub async fn update_achievement(
        &self,
        issue_id: &str,
        achievement: &Achievement,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.url(&["issues", issue_id, "achievement"]);
        let endpoint = url.path().to_string();
        let builder = self
            .client
            .put(url)
            .json(&AchievementChange { achievement });
        let body: Value = self.send(&endpoint, builder).await?;
        Ok(body.get("data").cloned())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        let builder = self.client.post(self.url(&["auth", "login"])).json(credentials);
        self.send("/auth/login", builder).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Value, ApiError> {
        let builder = self.client.post(self.url(&["auth", "signup"])).json(request);
        self.send("/auth/signup", builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> VoiceUpClient {
        VoiceUpClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn dashboard_stats_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "pending_issues": 5, "reported_issues": 3, "verified": 2,
                    "on_hold": 1, "in_progress": 4, "achievements": 6, "total_issues": 16
                }
            })))
            .mount(&server)
            .await;

        let stats = client_for(&server).await.dashboard_stats().await.unwrap();
        assert_eq!(stats.pending_issues, 5);
        assert_eq!(stats.achievements, 6);
        assert_eq!(stats.total_issues, Some(16));
    }

    #[tokio::test]
    async fn list_issues_sends_paging_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues"))
            .and(query_param("limit", "10"))
            .and(query_param("skip", "20"))
            .and(query_param("status", "In Progress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"_id": "a1", "title": "Broken lamp", "status": "In Progress"}],
                "count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = IssueQuery {
            limit: 10,
            skip: 20,
            status: Some("In Progress".into()),
        };
        let issues = client_for(&server).await.list_issues(&query).await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "a1");
    }

    #[tokio::test]
    async fn issue_details_returns_matching_issues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "issue": {"_id": "abc", "status": "Seen"},
                    "matching_issues": [{"_id": "def", "status": "Verified"}]
                }
            })))
            .mount(&server)
            .await;

        let details = client_for(&server).await.issue_details("abc").await.unwrap();
        assert_eq!(details.issue.id, "abc");
        assert_eq!(details.matching_issues[0].id, "def");
    }

    #[tokio::test]
    async fn not_found_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"success": false, "message": "Issue not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .issue_details("missing")
            .await
            .unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Issue not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.dashboard_stats().await.unwrap_err();
        assert_eq!(err.to_string(), "API error (status 502): HTTP error! status: 502");
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        // Nothing listens on port 1.
        let client = VoiceUpClient::new("http://127.0.0.1:1").unwrap();
        let err = client.dashboard_stats().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn update_status_puts_body_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/issues/abc/status"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"status": "Verified"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Issue status updated successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await.with_token(Some("secret".into()));
        let ack = client
            .update_issue_status("abc", "Verified".into())
            .await
            .unwrap();
        assert_eq!(ack.success, Some(true));
        assert_eq!(
            ack.message.as_deref(),
            Some("Issue status updated successfully")
        );
    }

    #[tokio::test]
    async fn create_issue_returns_whole_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/issues"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "message": "Issue created successfully",
                "issue_id": "new1"
            })))
            .mount(&server)
            .await;

        let issue = NewIssue {
            title: "Pothole".into(),
            status: "Seen".into(),
            ..NewIssue::default()
        };
        let created = client_for(&server).await.create_issue(&issue).await.unwrap();
        assert_eq!(created.issue_id.as_deref(), Some("new1"));
    }

    #[tokio::test]
    async fn update_achievement_wraps_payload() {
        let server = MockServer::start().await;
        let achievement = Achievement {
            government_official_name: "R. Perera".into(),
            designation: "Officer".into(),
            meeting_date: "2025-09-20".into(),
            issue_status: "Completed".into(),
            action_taken: "Resurfaced".into(),
            document_path: None,
        };
        Mock::given(method("PUT"))
            .and(path("/issues/abc/achievement"))
            .and(body_json(json!({"achievement": {
                "governmentOfficialName": "R. Perera",
                "designation": "Officer",
                "meetingDate": "2025-09-20",
                "issueStatus": "Completed",
                "actionTaken": "Resurfaced"
            }})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let data = client_for(&server)
            .await
            .update_achievement("abc", &achievement)
            .await
            .unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/search"))
            .and(query_param("q", "galle road"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let found = client_for(&server).await.search_issues("galle road").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn reposted_uses_own_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/reposted"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"_id": "r1", "status": "Seen"}]
            })))
            .mount(&server)
            .await;

        let issues = client_for(&server).await.reposted_issues(50, 0).await.unwrap();
        assert_eq!(issues[0].id, "r1");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = VoiceUpClient::new("http://localhost:5000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url(&["stats"]).as_str(), "http://localhost:5000/api/stats");

        let bare = VoiceUpClient::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(bare.url(&["stats"]).as_str(), "http://127.0.0.1:5000/stats");
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        let err = VoiceUpClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[tokio::test]
    async fn issue_id_is_escaped_as_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/issues/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"issue": {"_id": "abc", "status": "Seen"}}
            })))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/issues/abc%3Fx=1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Issue not found"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/issues/a%2Fb%23c/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.issue_details("abc?x=1").await.unwrap_err();
        assert!(err.is_not_found());
        let ack = client
            .update_issue_status("a/b#c", "Verified".into())
            .await
            .unwrap();
        assert_eq!(ack.success, Some(true));
    }
}
