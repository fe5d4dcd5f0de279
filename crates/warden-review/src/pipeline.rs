use async_trait::async_trait;
use warden_core::{DeliveryStatus, RepoReference, WardenError};

use crate::agent::ReviewAgent;
use crate::github::{self, GitHubClient};
use crate::slack::SlackClient;

/// Fixed acknowledgment posted to the PR once a review exists. The full
/// review text goes to Slack, not the PR thread.
const ACK_COMMENT: &str = "\u{2705} Pull request review completed successfully.";

/// Code-host operations the pipeline needs: the pre-flight existence check
/// and the best-effort acknowledgment comment.
#[async_trait]
pub trait CodeHost {
    /// Whether the pull request exists. `false` covers both "not found"
    /// and "check failed"; see [`GitHubClient::pr_exists`].
    async fn pr_exists(&self, repo: &RepoReference, pr_number: u64) -> bool;

    /// Post a comment on the pull request, returning a status message.
    async fn post_comment(
        &self,
        repo: &RepoReference,
        pr_number: u64,
        body: &str,
    ) -> Result<String, WardenError>;
}

/// Messaging channel that receives a copy of each review.
#[async_trait]
pub trait MessageSink {
    /// Send a message, returning a status message.
    async fn send_message(&self, text: &str) -> Result<String, WardenError>;
}

#[async_trait]
impl CodeHost for GitHubClient {
    async fn pr_exists(&self, repo: &RepoReference, pr_number: u64) -> bool {
        GitHubClient::pr_exists(self, &repo.owner, &repo.repo, pr_number).await
    }

    async fn post_comment(
        &self,
        repo: &RepoReference,
        pr_number: u64,
        body: &str,
    ) -> Result<String, WardenError> {
        self.add_comment(&repo.owner, &repo.repo, pr_number, body)
            .await
    }
}

#[async_trait]
impl MessageSink for SlackClient {
    async fn send_message(&self, text: &str) -> Result<String, WardenError> {
        SlackClient::send_message(self, text).await
    }
}

/// Result of one completed pipeline run, before history recording.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Parsed repository reference.
    pub repo: RepoReference,
    /// Pull request number.
    pub pr_number: u64,
    /// Full review text from the agent.
    pub review: String,
    /// Outcome of the PR comment step.
    pub github: DeliveryStatus,
    /// Outcome of the Slack step.
    pub slack: DeliveryStatus,
}

/// Orchestrator for one review run.
///
/// Sequences parse -> existence check -> agent -> notifications. The two
/// notification steps run concurrently and are best-effort: either can fail
/// without affecting the other or the response, and their outcomes are
/// reported inline. Everything before them short-circuits: a malformed
/// link, a missing PR, or an agent failure produces an error with no side
/// effects.
pub struct ReviewPipeline<H, A, M> {
    host: H,
    agent: A,
    messenger: M,
}

impl<H, A, M> ReviewPipeline<H, A, M>
where
    H: CodeHost + Sync,
    A: ReviewAgent + Sync,
    M: MessageSink + Sync,
{
    /// Create a pipeline from its three collaborators.
    pub fn new(host: H, agent: A, messenger: M) -> Self {
        Self {
            host,
            agent,
            messenger,
        }
    }

    /// Run one review end to end.
    ///
    /// # Errors
    ///
    /// - [`WardenError::InvalidInput`] when the repository link has fewer
    ///   than two path segments.
    /// - [`WardenError::NotFound`] when the pull request does not exist
    ///   (or the existence check failed).
    /// - Any error from the agent, surfaced unchanged.
    ///
    /// Notification failures are not errors; they come back as
    /// [`DeliveryStatus`] fields on the outcome.
    pub async fn run(
        &self,
        repo_link: &str,
        pr_number: u64,
    ) -> Result<ReviewOutcome, WardenError> {
        let repo = github::parse_repo_link(github::clean_repo_link(repo_link))?;

        if !self.host.pr_exists(&repo, pr_number).await {
            return Err(WardenError::NotFound(format!(
                "Pull Request #{pr_number} does not exist"
            )));
        }

        tracing::info!(repo = %repo.full_name(), pr_number, "running review");
        let review = self.agent.generate_review(&repo, pr_number).await?;

        let (github, slack) = tokio::join!(
            self.post_acknowledgment(&repo, pr_number),
            self.notify_channel(pr_number, &review),
        );

        Ok(ReviewOutcome {
            repo,
            pr_number,
            review,
            github,
            slack,
        })
    }

    async fn post_acknowledgment(&self, repo: &RepoReference, pr_number: u64) -> DeliveryStatus {
        match self.host.post_comment(repo, pr_number, ACK_COMMENT).await {
            Ok(message) => DeliveryStatus::ok(message),
            Err(e) => {
                tracing::warn!(repo = %repo.full_name(), pr_number, error = %e, "PR comment failed");
                DeliveryStatus::failed(e.to_string())
            }
        }
    }

    async fn notify_channel(&self, pr_number: u64, review: &str) -> DeliveryStatus {
        let text = format!("PR #{pr_number} Review:\n{review}");
        match self.messenger.send_message(&text).await {
            Ok(message) => DeliveryStatus::ok(message),
            Err(e) => {
                tracing::warn!(pr_number, error = %e, "Slack notification failed");
                DeliveryStatus::failed(e.to_string())
            }
        }
    }
}
