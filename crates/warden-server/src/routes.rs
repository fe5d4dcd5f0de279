use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use warden_core::{RepoReference, ReviewRecord, ReviewRequest, WardenError};
use warden_review::agent::ReviewAgent;
use warden_review::history::{HistoryStats, NewReview};
use warden_review::pipeline::{CodeHost, MessageSink};

use crate::AppState;

const DASHBOARD_HTML: &str = include_str!("../static/index.html");

/// Error wrapper that maps [`WardenError`] onto HTTP responses.
///
/// `InvalidInput` -> 400, `NotFound` -> 404, everything else -> 500. The
/// body carries a single free-text `detail` field; callers distinguishing
/// causes beyond the status code must match on the message.
#[derive(Debug)]
pub struct ApiError(pub WardenError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            WardenError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WardenError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match &self.0 {
            WardenError::InvalidInput(msg) | WardenError::NotFound(msg) => msg.clone(),
            other => format!("An error occurred: {other}"),
        }
    }
}

impl From<WardenError> for ApiError {
    fn from(err: WardenError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}

/// Response body for `POST /api/review`.
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub review: String,
    pub github_status: String,
    pub github_success: bool,
    pub slack_status: String,
    pub slack_success: bool,
    pub pr_info: PrInfo,
    pub history_id: u64,
}

/// Echo of the parsed request target.
#[derive(Debug, Serialize)]
pub struct PrInfo {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

impl PrInfo {
    fn new(repo: &RepoReference, pr_number: u64) -> Self {
        Self {
            owner: repo.owner.clone(),
            repo: repo.repo.clone(),
            pr_number,
        }
    }
}

/// Response body for `GET /api/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ReviewRecord>,
    pub total: usize,
}

/// Response body for the delete/clear endpoints.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /` — the embedded dashboard page.
pub async fn index() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// `POST /api/review` — run the full pipeline and record the result.
pub async fn review_pr<H, A, M>(
    State(state): State<Arc<AppState<H, A, M>>>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError>
where
    H: CodeHost + Send + Sync,
    A: ReviewAgent + Send + Sync,
    M: MessageSink + Send + Sync,
{
    let outcome = state
        .pipeline
        .run(&request.repo_link, request.pr_number)
        .await?;

    let record = state.history.lock().await.append(NewReview {
        repo_name: outcome.repo.full_name(),
        pr_number: outcome.pr_number,
        review: outcome.review.clone(),
        github: outcome.github.clone(),
        slack: outcome.slack.clone(),
    });

    Ok(Json(ReviewResponse {
        success: true,
        review: outcome.review,
        github_status: outcome.github.message,
        github_success: outcome.github.ok,
        slack_status: outcome.slack.message,
        slack_success: outcome.slack.ok,
        pr_info: PrInfo::new(&outcome.repo, outcome.pr_number),
        history_id: record.id,
    }))
}

/// `GET /api/history` — all records, newest first.
pub async fn get_history<H, A, M>(
    State(state): State<Arc<AppState<H, A, M>>>,
) -> Json<HistoryResponse> {
    let history = state.history.lock().await;
    Json(HistoryResponse {
        history: history.list().to_vec(),
        total: history.len(),
    })
}

/// `GET /api/history/{id}` — one record, or 404.
pub async fn get_review_detail<H, A, M>(
    State(state): State<Arc<AppState<H, A, M>>>,
    Path(id): Path<u64>,
) -> Result<Json<ReviewRecord>, ApiError> {
    let history = state.history.lock().await;
    match history.get(id) {
        Some(record) => Ok(Json(record.clone())),
        None => Err(ApiError(WardenError::NotFound("Review not found".into()))),
    }
}

/// `DELETE /api/history/{id}` — remove one record.
///
/// Reports success even when the id is absent; deletion of a missing
/// record is a no-op, not an error.
pub async fn delete_review<H, A, M>(
    State(state): State<Arc<AppState<H, A, M>>>,
    Path(id): Path<u64>,
) -> Json<ActionResponse> {
    state.history.lock().await.delete(id);
    Json(ActionResponse {
        success: true,
        message: "Review deleted".into(),
    })
}

/// `DELETE /api/history` — drop all records.
pub async fn clear_history<H, A, M>(
    State(state): State<Arc<AppState<H, A, M>>>,
) -> Json<ActionResponse> {
    state.history.lock().await.clear();
    Json(ActionResponse {
        success: true,
        message: "History cleared".into(),
    })
}

/// `GET /api/stats` — dashboard statistics.
pub async fn get_stats<H, A, M>(State(state): State<Arc<AppState<H, A, M>>>) -> Json<HistoryStats> {
    Json(state.history.lock().await.stats())
}

/// `GET /api/health` — liveness probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "warden" }))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use warden_review::pipeline::ReviewPipeline;

    use super::*;

    struct FakeHost {
        exists: bool,
        comment_fails: bool,
    }

    #[async_trait]
    impl CodeHost for FakeHost {
        async fn pr_exists(&self, _repo: &RepoReference, _pr_number: u64) -> bool {
            self.exists
        }

        async fn post_comment(
            &self,
            _repo: &RepoReference,
            _pr_number: u64,
            _body: &str,
        ) -> Result<String, WardenError> {
            if self.comment_fails {
                Err(WardenError::GitHub("comment rejected".into()))
            } else {
                Ok("Comment posted successfully.".to_string())
            }
        }
    }

    struct FakeAgent {
        review: String,
    }

    #[async_trait]
    impl ReviewAgent for FakeAgent {
        async fn generate_review(
            &self,
            _repo: &RepoReference,
            _pr_number: u64,
        ) -> Result<String, WardenError> {
            Ok(self.review.clone())
        }
    }

    struct FakeMessenger;

    #[async_trait]
    impl MessageSink for FakeMessenger {
        async fn send_message(&self, _text: &str) -> Result<String, WardenError> {
            Ok("Slack message sent successfully.".to_string())
        }
    }

    type TestState = Arc<AppState<FakeHost, FakeAgent, FakeMessenger>>;

    fn test_state(exists: bool, comment_fails: bool) -> TestState {
        let pipeline = ReviewPipeline::new(
            FakeHost {
                exists,
                comment_fails,
            },
            FakeAgent {
                review: "LGTM".into(),
            },
            FakeMessenger,
        );
        AppState::new(pipeline, 50)
    }

    fn review_request(pr_number: u64) -> ReviewRequest {
        ReviewRequest {
            repo_link: "https://github.com/acme/widgets".into(),
            pr_number,
        }
    }

    #[tokio::test]
    async fn review_happy_path_records_history() {
        let state = test_state(true, false);

        let Json(response) = review_pr(State(state.clone()), Json(review_request(7)))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.review, "LGTM");
        assert!(response.github_success);
        assert!(response.slack_success);
        assert_eq!(response.pr_info.owner, "acme");
        assert_eq!(response.pr_info.repo, "widgets");
        assert_eq!(response.history_id, 1);

        let history = state.history.lock().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(1).unwrap().status, "completed");
    }

    #[tokio::test]
    async fn review_missing_pr_returns_404_without_history() {
        let state = test_state(false, false);

        let err = review_pr(State(state.clone()), Json(review_request(7)))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.detail().contains("Pull Request #7"));
        assert!(state.history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn review_bad_link_returns_400() {
        let state = test_state(true, false);

        let err = review_pr(
            State(state),
            Json(ReviewRequest {
                repo_link: "https://github.com/acme".into(),
                pr_number: 7,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn review_partial_failure_still_succeeds() {
        let state = test_state(true, true);

        let Json(response) = review_pr(State(state.clone()), Json(review_request(7)))
            .await
            .unwrap();

        assert!(response.success);
        assert!(!response.github_success);
        assert!(response.github_status.contains("comment rejected"));
        assert!(response.slack_success);

        let history = state.history.lock().await;
        assert!(!history.get(1).unwrap().github_comment_added);
        assert!(history.get(1).unwrap().slack_message_sent);
    }

    #[tokio::test]
    async fn history_endpoints_roundtrip() {
        let state = test_state(true, false);
        review_pr(State(state.clone()), Json(review_request(1)))
            .await
            .unwrap();
        review_pr(State(state.clone()), Json(review_request(2)))
            .await
            .unwrap();

        let Json(listing) = get_history(State(state.clone())).await;
        assert_eq!(listing.total, 2);
        assert_eq!(listing.history[0].pr_number, 2);

        let Json(detail) = get_review_detail(State(state.clone()), Path(1))
            .await
            .unwrap();
        assert_eq!(detail.pr_number, 1);

        let Json(deleted) = delete_review(State(state.clone()), Path(1)).await;
        assert!(deleted.success);
        let err = get_review_detail(State(state.clone()), Path(1))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        // Deleting again is still a success.
        let Json(deleted) = delete_review(State(state.clone()), Path(1)).await;
        assert!(deleted.success);

        let Json(cleared) = clear_history(State(state.clone())).await;
        assert!(cleared.success);
        assert!(state.history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn stats_reflect_history() {
        let state = test_state(true, false);
        review_pr(State(state.clone()), Json(review_request(1)))
            .await
            .unwrap();

        let Json(stats) = get_stats(State(state)).await;
        assert_eq!(stats.total_reviews, 1);
        assert_eq!(stats.github_comments, 1);
        assert_eq!(stats.unique_repositories, 1);
        assert_eq!(stats.success_rate, 100.0);
    }

    #[tokio::test]
    async fn health_reports_service_name() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "warden");
    }

    #[test]
    fn api_error_maps_statuses() {
        assert_eq!(
            ApiError(WardenError::InvalidInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(WardenError::NotFound("x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(WardenError::Llm("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn api_error_detail_wraps_upstream_failures() {
        let err = ApiError(WardenError::Llm("model unavailable".into()));
        assert!(err.detail().starts_with("An error occurred:"));
        let err = ApiError(WardenError::NotFound("Review not found".into()));
        assert_eq!(err.detail(), "Review not found");
    }

    #[tokio::test]
    async fn index_serves_dashboard() {
        let Html(page) = index().await;
        assert!(page.contains("Warden"));
    }

    #[test]
    fn router_builds_with_fake_state() {
        let _router = crate::router(test_state(true, false));
    }
}
