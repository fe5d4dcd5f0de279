use serde::Deserialize;
use warden_core::{GithubConfig, RepoReference, WardenError};

/// Strip surrounding whitespace and a trailing `.git` suffix from a
/// repository link, as submitted by users.
///
/// # Examples
///
/// ```
/// use warden_review::github::clean_repo_link;
///
/// assert_eq!(
///     clean_repo_link("  https://github.com/acme/widgets.git "),
///     "https://github.com/acme/widgets"
/// );
/// ```
pub fn clean_repo_link(link: &str) -> &str {
    let trimmed = link.trim();
    trimmed.strip_suffix(".git").unwrap_or(trimmed)
}

/// Parse a repository link into an owner/repo pair.
///
/// Takes the URL path (everything after the host for `scheme://host/...`
/// forms, the whole string otherwise) and uses its first two non-empty
/// segments. Trailing segments such as `/pull/7` or `/tree/main` are
/// ignored, not validated. Case is preserved as-is.
///
/// # Errors
///
/// Returns [`WardenError::InvalidInput`] when fewer than two path segments
/// are present.
///
/// # Examples
///
/// ```
/// use warden_review::github::parse_repo_link;
///
/// let repo = parse_repo_link("https://github.com/acme/widgets").unwrap();
/// assert_eq!(repo.owner, "acme");
/// assert_eq!(repo.repo, "widgets");
/// ```
pub fn parse_repo_link(link: &str) -> Result<RepoReference, WardenError> {
    let path = match link.split_once("://") {
        // Drop the host segment after the scheme.
        Some((_, rest)) => rest.split_once('/').map(|(_, p)| p).unwrap_or(""),
        None => link,
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
        return Err(WardenError::InvalidInput(format!(
            "invalid repository link '{link}', expected https://github.com/owner/repo"
        )));
    };

    Ok(RepoReference {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Metadata and file-level details of a pull request.
///
/// This is the read capability the review agent works from: enough context
/// to describe the change without cloning the repository.
#[derive(Debug, Clone)]
pub struct PullRequestDetails {
    /// Pull request title.
    pub title: String,
    /// Pull request description, empty when the author left none.
    pub description: String,
    /// Login of the PR author.
    pub author: String,
    /// Branch the PR merges into.
    pub base_branch: String,
    /// Branch the PR comes from.
    pub head_branch: String,
    /// Changed files with their unified-diff patches.
    pub files: Vec<ChangedFile>,
}

/// One changed file within a pull request.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    /// Path of the file within the repository.
    pub filename: String,
    /// Change status reported by GitHub (`added`, `modified`, `removed`, ...).
    pub status: String,
    /// Unified-diff patch, absent for binary or very large files.
    pub patch: Option<String>,
}

#[derive(Deserialize)]
struct PrResponse {
    title: String,
    body: Option<String>,
    user: PrUser,
    base: PrBranch,
    head: PrBranch,
}

#[derive(Deserialize)]
struct PrUser {
    login: String,
}

#[derive(Deserialize)]
struct PrBranch {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Deserialize)]
struct PrFile {
    filename: String,
    status: String,
    patch: Option<String>,
}

/// GitHub Pull Request client for existence checks, detail fetches, and
/// comment posting.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl GitHubClient {
    /// Create a client from configuration, falling back to the
    /// `GITHUB_TOKEN` environment variable for the token.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Config`] if no token is available, or
    /// [`WardenError::GitHub`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use warden_core::GithubConfig;
    /// use warden_review::github::GitHubClient;
    ///
    /// let config = GithubConfig {
    ///     token: Some("ghp_xxxx".into()),
    ///     ..GithubConfig::default()
    /// };
    /// let client = GitHubClient::new(&config).unwrap();
    /// ```
    pub fn new(config: &GithubConfig) -> Result<Self, WardenError> {
        let token = match &config.token {
            Some(t) => t.clone(),
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                WardenError::Config(
                    "GITHUB_TOKEN not set. Add [github].token to warden.toml or set GITHUB_TOKEN"
                        .into(),
                )
            })?,
        };

        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.clone())
            .build()
            .map_err(|e| WardenError::GitHub(format!("failed to create GitHub client: {e}")))?;

        let http = reqwest::Client::new();

        Ok(Self {
            octocrab,
            http,
            token,
            api_base: config.api_base.clone(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "warden")
    }

    /// Check whether a pull request exists.
    ///
    /// Returns `true` only on an exact 200 response. Any other status and
    /// any transport failure yields `false`; transport failures are logged
    /// at `warn` so "check failed" remains distinguishable from "not found"
    /// in the logs even though the return value collapses them.
    pub async fn pr_exists(&self, owner: &str, repo: &str, pr_number: u64) -> bool {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{pr_number}", self.api_base);
        match self.get(&url).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::warn!(owner, repo, pr_number, error = %e, "PR existence check failed");
                false
            }
        }
    }

    /// Fetch metadata and changed files for a pull request.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::GitHub`] on network or API errors.
    pub async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<PullRequestDetails, WardenError> {
        let pr_url = format!("{}/repos/{owner}/{repo}/pulls/{pr_number}", self.api_base);
        let files_url = format!("{pr_url}/files");

        let pr: PrResponse = self.fetch_json(&pr_url).await?;
        let files: Vec<PrFile> = self.fetch_json(&files_url).await?;

        Ok(PullRequestDetails {
            title: pr.title,
            description: pr.body.unwrap_or_default(),
            author: pr.user.login,
            base_branch: pr.base.branch,
            head_branch: pr.head.branch,
            files: files
                .into_iter()
                .map(|f| ChangedFile {
                    filename: f.filename,
                    status: f.status,
                    patch: f.patch,
                })
                .collect(),
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, WardenError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| WardenError::GitHub(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WardenError::GitHub(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| WardenError::GitHub(format!("failed to parse response from {url}: {e}")))
    }

    /// Post a comment on a pull request.
    ///
    /// Comments on PRs go through the issues endpoint; the pulls endpoint
    /// only accepts line-anchored review comments.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::GitHub`] on API errors.
    pub async fn add_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<String, WardenError> {
        let route = format!("/repos/{owner}/{repo}/issues/{pr_number}/comments");
        let payload = serde_json::json!({ "body": body });

        let _response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(|e| WardenError::GitHub(format!("failed to post comment: {e}")))?;

        Ok("Comment posted successfully.".to_string())
    }
}
