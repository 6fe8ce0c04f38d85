//! GitHub API client with deadline support
//!
//! This crate provides the trait-based GitHub API gateway used by the
//! autoland workflow. The design follows the decorator pattern, allowing
//! call deadlines to be composed with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_pull_request()                          │
//! │  - fetch_pull_request_commits()                  │
//! │  - fetch_check_runs()                            │
//! │  - fetch_reviews() / create_review()             │
//! │  - create_issue_comment() / post_directive()     │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ DeadlineGitHubClient│
//! │ (direct API)    │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{DeadlineGitHubClient, GitHubClient, OctocrabClient};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let direct = OctocrabClient::with_token("token", None)?;
//! let client = DeadlineGitHubClient::new(direct, Duration::from_secs(30));
//!
//! let pr = client.fetch_pull_request("owner", "repo", 42).await?;
//! println!("{} is open: {}", pr.html_url, pr.is_open());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod deadline_client;
pub mod octocrab_client;
pub mod types;

/// Login of the dependabot app account
pub const DEPENDABOT_LOGIN: &str = "dependabot[bot]";

pub use client::GitHubClient;
pub use deadline_client::{DeadlineGitHubClient, DEFAULT_CALL_DEADLINE};
pub use octocrab_client::OctocrabClient;
pub use types::{
    CheckConclusion, CheckRun, CheckRunStatus, Directive, PullRequest, PullRequestCommit,
    PullRequestState, Review, ReviewEvent, ReviewState,
};
