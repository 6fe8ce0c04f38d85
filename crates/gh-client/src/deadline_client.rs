//! Deadline-bounded GitHub API client (decorator pattern)
//!
//! Wraps any `GitHubClient` implementation so that no single call can hang
//! longer than a configured deadline. A call that exceeds the deadline fails
//! like any other remote error.

use crate::client::GitHubClient;
use crate::types::{CheckRun, Directive, PullRequest, PullRequestCommit, Review, ReviewEvent};
use async_trait::async_trait;
use log::warn;
use std::future::Future;
use std::time::Duration;

/// Default per-call deadline
pub const DEFAULT_CALL_DEADLINE: Duration = Duration::from_secs(30);

/// GitHub API client that bounds every call with a deadline
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{DeadlineGitHubClient, OctocrabClient};
/// use std::time::Duration;
///
/// let inner = OctocrabClient::with_token("token", None)?;
/// let client = DeadlineGitHubClient::new(inner, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct DeadlineGitHubClient<C: GitHubClient> {
    inner: C,
    deadline: Duration,
}

impl<C: GitHubClient> DeadlineGitHubClient<C> {
    /// Create a new deadline-bounded client
    pub fn new(inner: C, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = anyhow::Result<T>> + Send,
    ) -> anyhow::Result<T> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("{} exceeded deadline of {:?}", operation, self.deadline);
                Err(anyhow::anyhow!(
                    "{} timed out after {:?}",
                    operation,
                    self.deadline
                ))
            }
        }
    }
}

#[async_trait]
impl<C: GitHubClient> GitHubClient for DeadlineGitHubClient<C> {
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        self.bounded(
            "GetPullRequest",
            self.inner.fetch_pull_request(owner, repo, pr_number),
        )
        .await
    }

    async fn fetch_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<PullRequestCommit>> {
        self.bounded(
            "ListCommits",
            self.inner.fetch_pull_request_commits(owner, repo, pr_number),
        )
        .await
    }

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>> {
        self.bounded(
            "ListCheckRunsForRef",
            self.inner.fetch_check_runs(owner, repo, commit_sha),
        )
        .await
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        self.bounded(
            "ListReviews",
            self.inner.fetch_reviews(owner, repo, pr_number),
        )
        .await
    }

    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> anyhow::Result<()> {
        self.bounded(
            "CreateReview",
            self.inner.create_review(owner, repo, pr_number, event, body),
        )
        .await
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<u64> {
        self.bounded(
            "CreateIssueComment",
            self.inner.create_issue_comment(owner, repo, pr_number, body),
        )
        .await
    }

    async fn post_directive(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        directive: Directive,
    ) -> anyhow::Result<()> {
        self.bounded(
            "CreateIssueComment",
            self.inner.post_directive(owner, repo, pr_number, directive),
        )
        .await
    }
}
