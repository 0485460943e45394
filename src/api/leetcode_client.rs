use std::collections::HashMap;
use std::future::Future;

use anyhow::Result;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::FetcherSettings;
use crate::domain::ProfilePayload;
use crate::domain::payload::{GraphqlError, GraphqlResponse, ProfileQueryData, QuestionQueryData};
use crate::errors::SourceError;
use crate::http::ThrottledClient;
use crate::scoring::{BreakdownStrategy, WeekBounds};

const PROFILE_QUERY: &str = r#"
query getUserProfile($username: String!, $limit: Int) {
  matchedUser(username: $username) {
    username
    submitStatsGlobal {
      acSubmissionNum {
        difficulty
        count
      }
    }
    profile {
      realName
      ranking
    }
    submissionCalendar
    languageProblemCount {
      languageName
      problemsSolved
    }
    tagProblemCounts {
      advanced {
        tagName
        problemsSolved
      }
      intermediate {
        tagName
        problemsSolved
      }
      fundamental {
        tagName
        problemsSolved
      }
    }
  }
  recentSubmissionList(username: $username, limit: $limit) {
    title
    titleSlug
    timestamp
    statusDisplay
    lang
  }
}
"#;

const QUESTION_QUERY: &str = r#"
query questionDifficulty($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    difficulty
  }
}
"#;

/// Anything that can produce a user's raw profile.
/// `week` is the week being scored; sources may skip extra work outside it.
pub trait ProfileSource {
    fn fetch_profile(
        &mut self,
        username: &str,
        week: WeekBounds,
    ) -> impl Future<Output = Result<ProfilePayload, SourceError>> + Send;
}

/// LeetCode GraphQL client
pub struct LeetCodeClient {
    http: ThrottledClient,
    graphql_url: String,
    recent_limit: usize,
    lookup_difficulties: bool,
    difficulties: HashMap<String, String>,
}

impl LeetCodeClient {
    pub fn new(settings: &FetcherSettings, strategy: BreakdownStrategy) -> Result<Self> {
        let http = ThrottledClient::new(
            &settings.user_agent,
            settings.timeout_secs,
            settings.min_request_interval_ms,
        )?;

        Ok(Self {
            http,
            graphql_url: settings.graphql_url.clone(),
            recent_limit: settings.recent_submission_limit,
            lookup_difficulties: strategy == BreakdownStrategy::DirectTally,
            difficulties: HashMap::new(),
        })
    }

    async fn query<T: DeserializeOwned>(&mut self, body: &Value) -> Result<GraphqlResponse<T>, SourceError> {
        let response = self
            .http
            .post_json(&self.graphql_url, body)
            .await
            .map_err(|e| SourceError::unavailable(describe_request_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::unavailable(format!("LeetCode returned status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::unavailable(describe_request_error(&e)))?;

        serde_json::from_slice(&bytes).map_err(|e| SourceError::malformed(e.to_string()))
    }

    /// Fill in difficulties of submissions accepted during `week`.
    /// Lookups that fail leave the field empty.
    async fn resolve_difficulties(&mut self, payload: &mut ProfilePayload, week: &WeekBounds) {
        for submission in payload.recent_submissions.iter_mut() {
            if !submission.is_accepted() || submission.difficulty.is_some() {
                continue;
            }
            if !submission.timestamp_secs().is_some_and(|timestamp| week.contains(timestamp)) {
                continue;
            }
            let Some(slug) = submission.title_slug.clone() else {
                continue;
            };
            submission.difficulty = self.question_difficulty(&slug).await;
        }
    }

    async fn question_difficulty(&mut self, slug: &str) -> Option<String> {
        if let Some(known) = self.difficulties.get(slug) {
            return Some(known.clone());
        }

        let body = json!({ "query": QUESTION_QUERY, "variables": { "titleSlug": slug } });
        let difficulty = match self.query::<QuestionQueryData>(&body).await {
            Ok(response) => response
                .data
                .and_then(|data| data.question)
                .and_then(|question| question.difficulty),
            Err(e) => {
                warn!("Difficulty lookup for {} failed: {}", slug, e);
                return None;
            }
        };

        match difficulty {
            Some(difficulty) => {
                debug!("{} is {}", slug, difficulty);
                self.difficulties.insert(slug.to_string(), difficulty.clone());
                Some(difficulty)
            }
            None => {
                debug!("No difficulty returned for {}", slug);
                None
            }
        }
    }
}

impl ProfileSource for LeetCodeClient {
    async fn fetch_profile(&mut self, username: &str, week: WeekBounds) -> Result<ProfilePayload, SourceError> {
        info!("Fetching LeetCode profile for {}", username);

        let body = json!({
            "query": PROFILE_QUERY,
            "variables": { "username": username, "limit": self.recent_limit },
        });
        let response = self.query::<ProfileQueryData>(&body).await?;
        let mut payload = into_profile(username, response)?;
        payload.recent_submissions.truncate(self.recent_limit);

        if self.lookup_difficulties {
            self.resolve_difficulties(&mut payload, &week).await;
        }

        Ok(payload)
    }
}

fn into_profile(
    username: &str,
    response: GraphqlResponse<ProfileQueryData>,
) -> Result<ProfilePayload, SourceError> {
    let Some(data) = response.data else {
        return Err(classify_errors(username, &response.errors));
    };

    match data.matched_user {
        Some(matched_user) => Ok(ProfilePayload {
            matched_user,
            recent_submissions: data.recent_submission_list.unwrap_or_default(),
        }),
        None => Err(SourceError::UserNotFound(username.to_string())),
    }
}

fn classify_errors(username: &str, errors: &[GraphqlError]) -> SourceError {
    if errors.is_empty() {
        return SourceError::malformed("response carried neither data nor errors");
    }

    let missing_user = errors.iter().any(|error| {
        let message = error.message.to_lowercase();
        message.contains("does not exist") || message.contains("not found")
    });
    if missing_user {
        return SourceError::UserNotFound(username.to_string());
    }

    let messages: Vec<&str> = errors.iter().map(|error| error.message.as_str()).collect();
    SourceError::malformed(messages.join("; "))
}

fn describe_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::{TimeZone, Utc};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn settings(addr: SocketAddr) -> FetcherSettings {
        FetcherSettings {
            graphql_url: format!("http://{addr}/graphql"),
            timeout_secs: 2,
            min_request_interval_ms: 0,
            recent_submission_limit: 2,
            ..FetcherSettings::default()
        }
    }

    /// The week holding the stub's submission timestamps
    fn stub_week() -> WeekBounds {
        WeekBounds::containing(&Utc.timestamp_opt(100, 0).unwrap())
    }

    fn profile_body() -> Value {
        json!({
            "data": {
                "matchedUser": {
                    "username": "alice",
                    "submitStatsGlobal": {"acSubmissionNum": [
                        {"difficulty": "All", "count": 17},
                        {"difficulty": "Easy", "count": 10},
                        {"difficulty": "Medium", "count": 5},
                        {"difficulty": "Hard", "count": 2}
                    ]},
                    "profile": {"realName": "Alice", "ranking": 1000},
                    "submissionCalendar": "{}"
                },
                "recentSubmissionList": [
                    {"title": "Two Sum", "titleSlug": "two-sum", "timestamp": "100", "statusDisplay": "Accepted", "lang": "rust"},
                    {"title": "LRU Cache", "titleSlug": "lru-cache", "timestamp": "90", "statusDisplay": "Wrong Answer", "lang": "rust"},
                    {"title": "Old", "titleSlug": "old", "timestamp": "80", "statusDisplay": "Accepted", "lang": "rust"}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_profile_truncates_recent_submissions() {
        let app = Router::new().route("/graphql", post(|| async { Json(profile_body()) }));
        let addr = serve(app).await;
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::Proportional).unwrap();

        let payload = client.fetch_profile("alice", stub_week()).await.unwrap();

        assert_eq!(payload.matched_user.username, "alice");
        assert_eq!(payload.recent_submissions.len(), 2);
        assert!(payload.recent_submissions[0].difficulty.is_none());
    }

    #[tokio::test]
    async fn test_missing_user_is_user_not_found() {
        let app = Router::new().route(
            "/graphql",
            post(|| async {
                Json(json!({
                    "data": {"matchedUser": null, "recentSubmissionList": null},
                    "errors": [{"message": "That user does not exist."}]
                }))
            }),
        );
        let addr = serve(app).await;
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::Proportional).unwrap();

        let error = client.fetch_profile("ghost", stub_week()).await.unwrap_err();
        assert_eq!(error, SourceError::UserNotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_is_source_unavailable() {
        let app = Router::new().route("/graphql", post(|| async { StatusCode::BAD_GATEWAY }));
        let addr = serve(app).await;
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::Proportional).unwrap();

        let error = client.fetch_profile("alice", stub_week()).await.unwrap_err();
        assert!(matches!(error, SourceError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_malformed() {
        let app = Router::new().route("/graphql", post(|| async { "<html>nope</html>" }));
        let addr = serve(app).await;
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::Proportional).unwrap();

        let error = client.fetch_profile("alice", stub_week()).await.unwrap_err();
        assert!(matches!(error, SourceError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_source_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::Proportional).unwrap();

        let error = client.fetch_profile("alice", stub_week()).await.unwrap_err();
        assert!(matches!(error, SourceError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_direct_tally_resolves_and_memoises_difficulties() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();
        let app = Router::new().route(
            "/graphql",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    let query = body["query"].as_str().unwrap_or_default();
                    if query.contains("questionDifficulty") {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Json(json!({"data": {"question": {"difficulty": "Easy"}}}))
                    } else {
                        Json(profile_body())
                    }
                }
            }),
        );
        let addr = serve(app).await;
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::DirectTally).unwrap();

        let first = client.fetch_profile("alice", stub_week()).await.unwrap();
        client.fetch_profile("alice", stub_week()).await.unwrap();

        assert_eq!(first.recent_submissions[0].difficulty.as_deref(), Some("Easy"));
        // rejected submissions are not looked up
        assert!(first.recent_submissions[1].difficulty.is_none());
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submissions_outside_the_week_are_not_looked_up() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();
        let app = Router::new().route(
            "/graphql",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    if body["query"].as_str().unwrap_or_default().contains("questionDifficulty") {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    Json(profile_body())
                }
            }),
        );
        let addr = serve(app).await;
        let mut client = LeetCodeClient::new(&settings(addr), BreakdownStrategy::DirectTally).unwrap();
        let later_week = WeekBounds::containing(&Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap());

        let payload = client.fetch_profile("alice", later_week).await.unwrap();

        assert!(payload.recent_submissions[0].difficulty.is_none());
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_errors_without_data() {
        let unknown = GraphqlError {
            message: "Internal error".to_string(),
        };
        assert!(matches!(
            classify_errors("bob", &[unknown]),
            SourceError::MalformedPayload(_)
        ));
        assert!(matches!(classify_errors("bob", &[]), SourceError::MalformedPayload(_)));
    }
}
