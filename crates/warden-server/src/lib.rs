//! HTTP layer for the Warden review service.
//!
//! Exposes the review pipeline and its history over a small JSON API plus
//! an embedded dashboard page. Handlers are generic over the pipeline's
//! capability traits so the HTTP layer can be exercised without network
//! access; [`serve`] wires in the real GitHub, Slack, and LLM clients.

pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use warden_core::{WardenConfig, WardenError};
use warden_review::agent::{LlmReviewAgent, ReviewAgent};
use warden_review::github::GitHubClient;
use warden_review::history::ReviewHistory;
use warden_review::llm::LlmClient;
use warden_review::pipeline::{CodeHost, MessageSink, ReviewPipeline};
use warden_review::slack::SlackClient;

/// Shared state behind every handler.
///
/// The history is the one piece of mutable state; it sits behind a mutex so
/// concurrent requests serialize their append/evict/delete/clear operations.
pub struct AppState<H, A, M> {
    /// The review orchestrator.
    pub pipeline: ReviewPipeline<H, A, M>,
    /// Capped log of completed runs.
    pub history: Mutex<ReviewHistory>,
}

impl<H, A, M> AppState<H, A, M> {
    /// Create state from a pipeline and an empty history of `capacity`.
    pub fn new(pipeline: ReviewPipeline<H, A, M>, capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            history: Mutex::new(ReviewHistory::new(capacity)),
        })
    }
}

/// Build the service router around shared state.
pub fn router<H, A, M>(state: Arc<AppState<H, A, M>>) -> Router
where
    H: CodeHost + Send + Sync + 'static,
    A: ReviewAgent + Send + Sync + 'static,
    M: MessageSink + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(routes::index))
        .route("/api/review", post(routes::review_pr))
        .route("/api/history", get(routes::get_history))
        .route("/api/history", delete(routes::clear_history))
        .route("/api/history/{id}", get(routes::get_review_detail))
        .route("/api/history/{id}", delete(routes::delete_review))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/health", get(routes::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Construct the real clients from configuration and run the server until
/// it is shut down.
///
/// # Errors
///
/// Returns [`WardenError::Config`] when a required credential is missing,
/// or [`WardenError::Io`] if the listener cannot bind.
pub async fn serve(config: &WardenConfig) -> Result<(), WardenError> {
    let github = GitHubClient::new(&config.github)?;
    let agent = LlmReviewAgent::new(GitHubClient::new(&config.github)?, LlmClient::new(&config.llm)?);
    let slack = SlackClient::new(&config.slack)?;

    let pipeline = ReviewPipeline::new(github, agent, slack);
    let state = AppState::new(pipeline, config.server.history_capacity);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!(addr = %config.server.bind_addr, "warden listening");
    axum::serve(listener, app).await?;
    Ok(())
}
