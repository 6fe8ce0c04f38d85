//! GitHub client trait
//!
//! This module defines the `GitHubClient` trait: the remote repository
//! gateway the autoland workflow talks to. Every call may fail with a
//! transport or API error, reported as `anyhow::Error`.

use crate::types::{CheckRun, Directive, PullRequest, PullRequestCommit, Review, ReviewEvent};
use async_trait::async_trait;

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub API.
/// Implementations can be direct (hitting the API) or decorated
/// with deadlines, retry logic, etc.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{Directive, GitHubClient};
///
/// async fn ask_for_rebase(client: &dyn GitHubClient) -> anyhow::Result<()> {
///     client.post_directive("octocat", "hello-world", 42, Directive::Rebase).await
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch a single pull request by number
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest>;

    /// Fetch every commit of a pull request
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    async fn fetch_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<PullRequestCommit>>;

    /// Fetch every CI check run for a specific commit
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `commit_sha` - The commit SHA to get checks for
    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>>;

    /// Fetch every submitted review on a pull request
    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>>;

    /// Create a review on a pull request
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `pr_number` - Pull request number
    /// * `event` - Review event (approve, request changes, or comment)
    /// * `body` - Optional review comment body
    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> anyhow::Result<()>;

    /// Post a conversational comment on a pull request
    ///
    /// Returns the GitHub comment ID.
    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<u64>;

    /// Ask dependabot to act on a pull request
    ///
    /// Posts the directive's comment body. Does not wait for dependabot to
    /// react.
    async fn post_directive(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        directive: Directive,
    ) -> anyhow::Result<()> {
        self.create_issue_comment(owner, repo, pr_number, directive.comment_body())
            .await
            .map(|_| ())
    }
}
