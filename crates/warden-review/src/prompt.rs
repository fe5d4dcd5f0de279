use std::fmt::Write;

use crate::github::PullRequestDetails;

const SYSTEM_PROMPT: &str = "\
You are Warden, an experienced code reviewer. You are given the metadata \
and changed files of a pull request and write a review another engineer \
would find useful.

Rules:
- Base every observation on the patches you are shown; do not speculate
- Call out bugs, security issues, and logic errors first
- Mention style only when it hides a defect
- Keep the review focused; skip files with trivial changes

Structure the review as markdown with these sections:
## Summary
## Strengths
## Issues
## Verdict";

/// Build the system prompt for the review LLM.
///
/// # Examples
///
/// ```
/// use warden_review::prompt::build_system_prompt;
///
/// let prompt = build_system_prompt();
/// assert!(prompt.contains("Warden"));
/// assert!(prompt.contains("## Verdict"));
/// ```
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the user prompt describing the pull request under review.
///
/// Renders the PR metadata followed by each changed file's status and
/// patch. Files without a patch (binary or oversized) are listed by name
/// only.
pub fn build_review_prompt(details: &PullRequestDetails) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Review the following pull request.\n");
    let _ = writeln!(prompt, "Title: {}", details.title);
    let _ = writeln!(prompt, "Author: {}", details.author);
    let _ = writeln!(
        prompt,
        "Branches: {} <- {}",
        details.base_branch, details.head_branch
    );
    if !details.description.is_empty() {
        let _ = writeln!(prompt, "\nDescription:\n{}", details.description);
    }

    let _ = writeln!(prompt, "\nChanged files ({}):", details.files.len());
    for file in &details.files {
        let _ = writeln!(prompt, "\n### {} ({})", file.filename, file.status);
        match &file.patch {
            Some(patch) => {
                let _ = writeln!(prompt, "```diff\n{patch}\n```");
            }
            None => {
                let _ = writeln!(prompt, "(no textual patch available)");
            }
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{ChangedFile, PullRequestDetails};

    fn make_details() -> PullRequestDetails {
        PullRequestDetails {
            title: "Add retry logic".into(),
            description: "Retries transient failures.".into(),
            author: "octocat".into(),
            base_branch: "main".into(),
            head_branch: "feature/retries".into(),
            files: vec![
                ChangedFile {
                    filename: "src/client.rs".into(),
                    status: "modified".into(),
                    patch: Some("+retry();".into()),
                },
                ChangedFile {
                    filename: "assets/logo.png".into(),
                    status: "added".into(),
                    patch: None,
                },
            ],
        }
    }

    #[test]
    fn system_prompt_contains_key_instructions() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("do not speculate"));
        assert!(prompt.contains("## Summary"));
    }

    #[test]
    fn review_prompt_includes_metadata_and_patches() {
        let prompt = build_review_prompt(&make_details());
        assert!(prompt.contains("Add retry logic"));
        assert!(prompt.contains("octocat"));
        assert!(prompt.contains("main <- feature/retries"));
        assert!(prompt.contains("+retry();"));
        assert!(prompt.contains("Changed files (2)"));
    }

    #[test]
    fn review_prompt_marks_files_without_patch() {
        let prompt = build_review_prompt(&make_details());
        assert!(prompt.contains("assets/logo.png"));
        assert!(prompt.contains("no textual patch"));
    }

    #[test]
    fn review_prompt_omits_empty_description() {
        let mut details = make_details();
        details.description.clear();
        let prompt = build_review_prompt(&details);
        assert!(!prompt.contains("Description:"));
    }
}
