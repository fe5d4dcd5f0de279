use serde::{Deserialize, Serialize};

/// Maximum length of a stored review summary, in characters.
const SUMMARY_MAX_CHARS: usize = 150;

/// An owner/repo pair identifying a repository on the code host.
///
/// Derived once per request from the submitted repository link and discarded
/// when the request completes.
///
/// # Examples
///
/// ```
/// use warden_core::RepoReference;
///
/// let repo = RepoReference {
///     owner: "acme".into(),
///     repo: "widgets".into(),
/// };
/// assert_eq!(repo.full_name(), "acme/widgets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoReference {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl RepoReference {
    /// Render as the conventional `owner/repo` string.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Request body for `POST /api/review`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// Link to the repository, e.g. `https://github.com/acme/widgets`.
    pub repo_link: String,
    /// Pull request number within that repository.
    pub pr_number: u64,
}

/// Outcome of one best-effort notification channel.
///
/// Both channels always run once a review exists; a failure here is
/// reported inline, never propagated as a request error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStatus {
    /// Whether the delivery succeeded.
    pub ok: bool,
    /// Human-readable status or failure description.
    pub message: String,
}

impl DeliveryStatus {
    /// A successful delivery with the given status message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    /// A failed delivery with the given failure description.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One completed review run, as kept in the in-memory history.
///
/// Records are created once per completed request and never mutated; they
/// leave the history only through explicit deletion, capacity eviction, or
/// a full clear. Ids are monotonic within a process lifetime and are not
/// reused after deletion, so an id is a stable handle, not a dense index.
///
/// # Examples
///
/// ```
/// use warden_core::ReviewRecord;
///
/// let record = ReviewRecord {
///     id: 1,
///     timestamp: "2026-02-11T09:30:00Z".into(),
///     repo_name: "acme/widgets".into(),
///     pr_number: 7,
///     review_summary: "LGTM".into(),
///     review_full: "LGTM".into(),
///     github_comment_added: true,
///     slack_message_sent: true,
///     github_message: "Comment posted successfully.".into(),
///     slack_message: "Slack message sent successfully.".into(),
///     status: "completed".into(),
/// };
/// assert_eq!(record.repo_name, "acme/widgets");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Monotonic 1-based identifier, unique within a process lifetime.
    pub id: u64,
    /// RFC 3339 timestamp of when the review completed.
    pub timestamp: String,
    /// Repository in `owner/repo` form.
    pub repo_name: String,
    /// Pull request number.
    pub pr_number: u64,
    /// Review text truncated to 150 characters (plus ellipsis).
    pub review_summary: String,
    /// Full review text.
    pub review_full: String,
    /// Whether the PR comment was posted.
    pub github_comment_added: bool,
    /// Whether the Slack message was sent.
    pub slack_message_sent: bool,
    /// Status message from the PR comment step.
    pub github_message: String,
    /// Status message from the Slack step.
    pub slack_message: String,
    /// Run status, currently always `"completed"`.
    pub status: String,
}

/// Truncate review text for history listings.
///
/// Returns the text verbatim when it fits in 150 characters, otherwise the
/// first 150 characters followed by `"..."`. Counts characters, not bytes,
/// so multi-byte text never gets split mid-codepoint.
///
/// # Examples
///
/// ```
/// use warden_core::summarize;
///
/// assert_eq!(summarize("LGTM"), "LGTM");
/// let long = "x".repeat(200);
/// let summary = summarize(&long);
/// assert_eq!(summary.chars().count(), 153);
/// assert!(summary.ends_with("..."));
/// ```
pub fn summarize(text: &str) -> String {
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        text.to_string()
    } else {
        let mut summary: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        summary.push_str("...");
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_owner_and_repo() {
        let repo = RepoReference {
            owner: "rust-lang".into(),
            repo: "rust".into(),
        };
        assert_eq!(repo.full_name(), "rust-lang/rust");
    }

    #[test]
    fn summarize_keeps_short_text_verbatim() {
        assert_eq!(summarize("looks good"), "looks good");
        let exactly_150 = "a".repeat(150);
        assert_eq!(summarize(&exactly_150), exactly_150);
    }

    #[test]
    fn summarize_truncates_long_text() {
        let long = "b".repeat(151);
        let summary = summarize(&long);
        assert_eq!(summary, format!("{}...", "b".repeat(150)));
    }

    #[test]
    fn summarize_counts_chars_not_bytes() {
        let long: String = "é".repeat(200);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), 153);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn review_record_serializes_with_wire_field_names() {
        let record = ReviewRecord {
            id: 3,
            timestamp: "2026-02-11T09:30:00Z".into(),
            repo_name: "acme/widgets".into(),
            pr_number: 7,
            review_summary: "ok".into(),
            review_full: "ok".into(),
            github_comment_added: true,
            slack_message_sent: false,
            github_message: "posted".into(),
            slack_message: "failed".into(),
            status: "completed".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["repo_name"], "acme/widgets");
        assert_eq!(json["github_comment_added"], true);
        assert_eq!(json["slack_message_sent"], false);
    }

    #[test]
    fn delivery_status_constructors() {
        let ok = DeliveryStatus::ok("sent");
        assert!(ok.ok);
        let failed = DeliveryStatus::failed("timed out");
        assert!(!failed.ok);
        assert_eq!(failed.message, "timed out");
    }
}
