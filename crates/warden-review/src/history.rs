use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use warden_core::{summarize, DeliveryStatus, ReviewRecord};

/// Inputs for one history entry, produced by a completed pipeline run.
#[derive(Debug, Clone)]
pub struct NewReview {
    /// Repository in `owner/repo` form.
    pub repo_name: String,
    /// Pull request number.
    pub pr_number: u64,
    /// Full review text from the agent.
    pub review: String,
    /// Outcome of the PR comment step.
    pub github: DeliveryStatus,
    /// Outcome of the Slack step.
    pub slack: DeliveryStatus,
}

/// Aggregate statistics over the current history contents.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    /// Number of records currently held.
    pub total_reviews: usize,
    /// Records whose PR comment was posted.
    pub github_comments: usize,
    /// Records whose Slack message was sent.
    pub slack_messages: usize,
    /// Distinct `owner/repo` values seen.
    pub unique_repositories: usize,
    /// Records created today (UTC).
    pub today_reviews: usize,
    /// Percentage of records with a posted PR comment, one decimal.
    pub success_rate: f64,
}

/// Capped, newest-first log of completed review runs.
///
/// Purely synchronous; the server shares one instance behind a
/// `tokio::sync::Mutex` so concurrent requests serialize on it. Ids grow
/// monotonically and are never reused, so deleting a record leaves a gap
/// rather than renumbering the rest.
///
/// # Examples
///
/// ```
/// use warden_core::DeliveryStatus;
/// use warden_review::history::{NewReview, ReviewHistory};
///
/// let mut history = ReviewHistory::new(50);
/// let record = history.append(NewReview {
///     repo_name: "acme/widgets".into(),
///     pr_number: 7,
///     review: "LGTM".into(),
///     github: DeliveryStatus::ok("posted"),
///     slack: DeliveryStatus::ok("sent"),
/// });
/// assert_eq!(record.id, 1);
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Debug)]
pub struct ReviewHistory {
    entries: Vec<ReviewRecord>,
    next_id: u64,
    capacity: usize,
}

impl ReviewHistory {
    /// Create an empty history holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            capacity,
        }
    }

    /// Append a completed run, evicting the oldest record beyond capacity.
    ///
    /// Returns a clone of the stored record, including its assigned id.
    pub fn append(&mut self, review: NewReview) -> ReviewRecord {
        let record = ReviewRecord {
            id: self.next_id,
            timestamp: Utc::now().to_rfc3339(),
            repo_name: review.repo_name,
            pr_number: review.pr_number,
            review_summary: summarize(&review.review),
            review_full: review.review,
            github_comment_added: review.github.ok,
            slack_message_sent: review.slack.ok,
            github_message: review.github.message,
            slack_message: review.slack.message,
            status: "completed".to_string(),
        };
        self.next_id += 1;

        self.entries.insert(0, record.clone());
        self.entries.truncate(self.capacity);
        record
    }

    /// All records, newest first.
    pub fn list(&self) -> &[ReviewRecord] {
        &self.entries
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Option<&ReviewRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Remove a record by id. Returns whether anything was removed; a
    /// missing id is a no-op.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    /// Remove all records. Ids are not reset.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compute dashboard statistics over the current contents.
    pub fn stats(&self) -> HistoryStats {
        let total_reviews = self.entries.len();
        let github_comments = self
            .entries
            .iter()
            .filter(|r| r.github_comment_added)
            .count();
        let slack_messages = self.entries.iter().filter(|r| r.slack_message_sent).count();
        let unique_repositories = self
            .entries
            .iter()
            .map(|r| r.repo_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let today_reviews = self
            .entries
            .iter()
            .filter(|r| r.timestamp.starts_with(&today))
            .count();

        let success_rate = if total_reviews == 0 {
            0.0
        } else {
            (github_comments as f64 / total_reviews as f64 * 1000.0).round() / 10.0
        };

        HistoryStats {
            total_reviews,
            github_comments,
            slack_messages,
            unique_repositories,
            today_reviews,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(repo: &str, pr: u64) -> NewReview {
        NewReview {
            repo_name: repo.into(),
            pr_number: pr,
            review: "looks fine".into(),
            github: DeliveryStatus::ok("Comment posted successfully."),
            slack: DeliveryStatus::ok("Slack message sent successfully."),
        }
    }

    #[test]
    fn append_assigns_monotonic_ids_newest_first() {
        let mut history = ReviewHistory::new(50);
        let first = history.append(review("acme/widgets", 1));
        let second = history.append(review("acme/widgets", 2));
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(history.list()[0].id, 2);
        assert_eq!(history.list()[1].id, 1);
    }

    #[test]
    fn append_evicts_oldest_beyond_capacity() {
        let mut history = ReviewHistory::new(50);
        for pr in 1..=51 {
            history.append(review("acme/widgets", pr));
        }
        assert_eq!(history.len(), 50);
        // The first record (id 1) fell off the tail.
        assert!(history.get(1).is_none());
        assert!(history.get(2).is_some());
        assert_eq!(history.list()[0].id, 51);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut history = ReviewHistory::new(3);
        for pr in 1..=10 {
            history.append(review("acme/widgets", pr));
            assert!(history.len() <= 3);
        }
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let mut history = ReviewHistory::new(50);
        history.append(review("acme/widgets", 1));
        assert!(!history.delete(999));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn delete_does_not_renumber_remaining_ids() {
        let mut history = ReviewHistory::new(50);
        history.append(review("acme/widgets", 1));
        let second = history.append(review("acme/widgets", 2));
        assert!(history.delete(1));
        assert_eq!(history.get(second.id).unwrap().id, 2);
        // New appends continue the sequence.
        let third = history.append(review("acme/widgets", 3));
        assert_eq!(third.id, 3);
    }

    #[test]
    fn clear_empties_but_keeps_id_sequence() {
        let mut history = ReviewHistory::new(50);
        history.append(review("acme/widgets", 1));
        history.clear();
        assert!(history.is_empty());
        let next = history.append(review("acme/widgets", 2));
        assert_eq!(next.id, 2);
    }

    #[test]
    fn append_summarizes_long_reviews() {
        let mut history = ReviewHistory::new(50);
        let mut long = review("acme/widgets", 1);
        long.review = "x".repeat(200);
        let record = history.append(long);
        assert_eq!(record.review_summary.chars().count(), 153);
        assert!(record.review_summary.ends_with("..."));
        assert_eq!(record.review_full.len(), 200);
    }

    #[test]
    fn stats_over_mixed_outcomes() {
        let mut history = ReviewHistory::new(50);
        history.append(review("acme/widgets", 1));
        let mut failed = review("acme/gadgets", 2);
        failed.github = DeliveryStatus::failed("GitHub error: 403");
        failed.slack = DeliveryStatus::failed("Slack error: channel_not_found");
        history.append(failed);
        history.append(review("acme/widgets", 3));

        let stats = history.stats();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.github_comments, 2);
        assert_eq!(stats.slack_messages, 2);
        assert_eq!(stats.unique_repositories, 2);
        assert_eq!(stats.today_reviews, 3);
        assert_eq!(stats.success_rate, 66.7);
    }

    #[test]
    fn stats_on_empty_history() {
        let history = ReviewHistory::new(50);
        let stats = history.stats();
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.success_rate, 0.0);
    }
}
