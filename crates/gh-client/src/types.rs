//! GitHub API data transfer objects
//!
//! These types represent the subset of GitHub API data the autoland workflow
//! reads. They are intentionally separate from octocrab's models so that the
//! workflow and its tests never depend on octocrab directly.

use serde::{Deserialize, Serialize};

/// A pull request as returned by a live read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// Author's GitHub login
    pub author: String,

    /// Open or closed
    pub state: PullRequestState,

    /// Whether the PR has been merged
    pub merged: bool,

    /// HEAD commit SHA
    pub head_sha: String,

    /// PR URL for opening in browser
    pub html_url: String,
}

impl PullRequest {
    /// A PR is open when GitHub reports it open and it has not been merged
    pub fn is_open(&self) -> bool {
        self.state == PullRequestState::Open && !self.merged
    }
}

/// Pull request state as reported by GitHub
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
}

/// A commit belonging to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestCommit {
    /// Commit SHA
    pub sha: String,

    /// Login of the GitHub user the commit is attributed to.
    /// `None` when the commit email does not map to a GitHub account.
    pub author_login: Option<String>,

    /// Whether GitHub verified the commit signature
    pub verified: bool,
}

/// A CI check run from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check run ID
    pub id: u64,

    /// Name of the check (e.g., "build", "test")
    pub name: String,

    /// Current status
    pub status: CheckRunStatus,

    /// Conclusion (only set when status is Completed)
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    /// Whether the run has reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status == CheckRunStatus::Completed
    }

    /// Whether the run finished with a conclusion that does not block a merge
    pub fn is_passing(&self) -> bool {
        matches!(
            self.conclusion,
            Some(CheckConclusion::Success | CheckConclusion::Neutral | CheckConclusion::Skipped)
        )
    }
}

/// Status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Check passed
    Success,
    /// Check failed
    Failure,
    /// Check was neutral (neither success nor failure)
    Neutral,
    /// Check was cancelled
    Cancelled,
    /// Check was skipped
    Skipped,
    /// Check timed out
    TimedOut,
    /// Action is required from the user
    ActionRequired,
    /// Check is stale (superseded by newer run)
    Stale,
    /// Conclusion this client does not know; never counts as passing
    #[serde(other)]
    Unknown,
}

/// A submitted review on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review ID
    pub id: u64,

    /// Review state
    pub state: ReviewState,

    /// Reviewer's GitHub login
    pub author_login: Option<String>,
}

/// State of a submitted review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
}

/// Review event type for PR reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    /// Approve the PR
    Approve,
    /// Request changes
    RequestChanges,
    /// Comment only (no approval/rejection)
    Comment,
}

/// A conversational command addressed to dependabot
///
/// Dependabot watches PR comments and reacts to `@dependabot <command>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    /// Rebase the PR branch onto its base
    Rebase,
    /// Merge the PR once branch protection allows it
    Merge,
}

impl Directive {
    /// The comment body that triggers this directive
    pub fn comment_body(&self) -> &'static str {
        match self {
            Directive::Rebase => "@dependabot rebase",
            Directive::Merge => "@dependabot merge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(status: CheckRunStatus, conclusion: Option<CheckConclusion>) -> CheckRun {
        CheckRun {
            id: 1,
            name: "build".to_string(),
            status,
            conclusion,
        }
    }

    #[test]
    fn test_pull_request_is_open() {
        let mut pr = PullRequest {
            number: 7,
            author: "dependabot[bot]".to_string(),
            state: PullRequestState::Open,
            merged: false,
            head_sha: "abc123".to_string(),
            html_url: "https://github.com/owner/repo/pull/7".to_string(),
        };
        assert!(pr.is_open());

        pr.merged = true;
        assert!(!pr.is_open());

        pr.merged = false;
        pr.state = PullRequestState::Closed;
        assert!(!pr.is_open());
    }

    #[test]
    fn test_check_run_terminal_and_passing() {
        assert!(!check(CheckRunStatus::Queued, None).is_terminal());
        assert!(!check(CheckRunStatus::InProgress, None).is_terminal());
        assert!(check(CheckRunStatus::Completed, Some(CheckConclusion::Failure)).is_terminal());

        assert!(check(CheckRunStatus::Completed, Some(CheckConclusion::Success)).is_passing());
        assert!(check(CheckRunStatus::Completed, Some(CheckConclusion::Skipped)).is_passing());
        assert!(!check(CheckRunStatus::Completed, Some(CheckConclusion::TimedOut)).is_passing());
        assert!(!check(CheckRunStatus::InProgress, None).is_passing());
        assert!(!check(CheckRunStatus::Completed, Some(CheckConclusion::Unknown)).is_passing());
    }

    #[test]
    fn test_check_run_status_serde() {
        let status: CheckRunStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, CheckRunStatus::InProgress);

        let conclusion: CheckConclusion = serde_json::from_str("\"action_required\"").unwrap();
        assert_eq!(conclusion, CheckConclusion::ActionRequired);

        let conclusion: CheckConclusion = serde_json::from_str("\"startup_failure\"").unwrap();
        assert_eq!(conclusion, CheckConclusion::Unknown);
    }

    #[test]
    fn test_review_state_uses_github_casing() {
        let state: ReviewState = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(state, ReviewState::Approved);

        let state: ReviewState = serde_json::from_str("\"CHANGES_REQUESTED\"").unwrap();
        assert_eq!(state, ReviewState::ChangesRequested);

        assert_eq!(
            serde_json::to_string(&ReviewEvent::Approve).unwrap(),
            "\"APPROVE\""
        );
    }

    #[test]
    fn test_directive_comment_body() {
        assert_eq!(Directive::Rebase.comment_body(), "@dependabot rebase");
        assert_eq!(Directive::Merge.comment_body(), "@dependabot merge");
    }
}
