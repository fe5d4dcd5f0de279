use async_trait::async_trait;
use warden_core::{RepoReference, WardenError};

use crate::github::GitHubClient;
use crate::llm::{ChatMessage, LlmClient, Role};
use crate::prompt;

/// Capability that turns a repository + PR number into review text.
///
/// How the review is produced is an implementation detail behind this
/// trait; the orchestrator only sees the final text. Any error here fails
/// the whole request atomically, so implementations should not leave
/// partial side effects behind.
#[async_trait]
pub trait ReviewAgent {
    /// Generate a free-text review for the given pull request.
    async fn generate_review(
        &self,
        repo: &RepoReference,
        pr_number: u64,
    ) -> Result<String, WardenError>;
}

/// Review agent backed by an OpenAI-compatible LLM.
///
/// Fetches the pull request details as its read capability, renders them
/// into a prompt, and makes a single chat call. The request timeout comes
/// from the LLM client configuration.
pub struct LlmReviewAgent {
    github: GitHubClient,
    llm: LlmClient,
}

impl LlmReviewAgent {
    /// Create an agent from already-constructed clients.
    pub fn new(github: GitHubClient, llm: LlmClient) -> Self {
        Self { github, llm }
    }
}

#[async_trait]
impl ReviewAgent for LlmReviewAgent {
    async fn generate_review(
        &self,
        repo: &RepoReference,
        pr_number: u64,
    ) -> Result<String, WardenError> {
        let details = self
            .github
            .fetch_pull_request(&repo.owner, &repo.repo, pr_number)
            .await?;

        tracing::debug!(
            repo = %repo.full_name(),
            pr_number,
            files = details.files.len(),
            model = self.llm.model(),
            "generating review"
        );

        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: prompt::build_system_prompt(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt::build_review_prompt(&details),
            },
        ];

        self.llm.chat(messages).await
    }
}
