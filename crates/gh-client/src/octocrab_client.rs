//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! This client makes real API calls without any deadline or retry handling.

use crate::client::GitHubClient;
use crate::types::{
    CheckConclusion, CheckRun, CheckRunStatus, PullRequest, PullRequestCommit, PullRequestState,
    Review, ReviewEvent, ReviewState,
};
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Page size for list endpoints (GitHub maximum)
const PER_PAGE: u8 = 100;

/// Upper bound on pages fetched from a single list endpoint
const MAX_PAGES: u32 = 10;

/// Direct GitHub API client using octocrab
///
/// This is the base implementation that makes actual API calls.
/// It can be wrapped by `DeadlineGitHubClient` to bound each call.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Build a client authenticated with a personal access token
    ///
    /// `base_uri` points the client at a GitHub Enterprise API root
    /// (e.g. `https://ghe.example.com/api/v3`); `None` targets api.github.com.
    pub fn with_token(token: impl Into<String>, base_uri: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.into());
        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .with_context(|| format!("Invalid GitHub API URL '{}'", uri))?;
        }
        let octocrab = builder.build().context("Failed to build GitHub client")?;
        Ok(Self::new(Arc::new(octocrab)))
    }
}

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

impl PageParams {
    fn page(page: u32) -> Self {
        Self {
            per_page: PER_PAGE,
            page,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginDto {
    login: String,
}

#[derive(Debug, Deserialize)]
struct VerificationDto {
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct GitCommitDto {
    verification: Option<VerificationDto>,
}

#[derive(Debug, Deserialize)]
struct CommitDto {
    sha: String,
    commit: GitCommitDto,
    author: Option<LoginDto>,
}

#[derive(Debug, Deserialize)]
struct CheckRunDto {
    id: u64,
    name: String,
    status: String,
    conclusion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckRunsPageDto {
    total_count: u64,
    check_runs: Vec<CheckRunDto>,
}

#[derive(Debug, Deserialize)]
struct ReviewDto {
    id: u64,
    state: String,
    user: Option<LoginDto>,
}

#[derive(Debug, Serialize)]
struct CreateReviewBody<'a> {
    event: ReviewEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR {}/{}#{}", owner, repo, pr_number);

        let pr = self
            .octocrab
            .pulls(owner, repo)
            .get(pr_number)
            .await
            .with_context(|| format!("Failed to fetch PR {}/{}#{}", owner, repo, pr_number))?;

        Ok(convert_pull_request(&pr))
    }

    async fn fetch_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<PullRequestCommit>> {
        debug!("Fetching commits for {}/{}#{}", owner, repo, pr_number);

        // Raw GET: we need the author login and verification flag only
        let route = format!("/repos/{}/{}/pulls/{}/commits", owner, repo, pr_number);
        let mut commits = Vec::new();

        for page_num in 1..=MAX_PAGES {
            let page: Vec<CommitDto> = self
                .octocrab
                .get(&route, Some(&PageParams::page(page_num)))
                .await
                .with_context(|| {
                    format!("Failed to list commits for {}/{}#{}", owner, repo, pr_number)
                })?;
            let is_last = page.len() < PER_PAGE as usize;

            commits.extend(page.into_iter().map(|c| PullRequestCommit {
                sha: c.sha,
                author_login: c.author.map(|a| a.login),
                verified: c.commit.verification.is_some_and(|v| v.verified),
            }));

            if is_last {
                break;
            }
        }

        debug!(
            "Fetched {} commits for {}/{}#{}",
            commits.len(),
            owner,
            repo,
            pr_number
        );
        Ok(commits)
    }

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>> {
        debug!(
            "Fetching check runs for {}/{} @ {}",
            owner, repo, commit_sha
        );

        let route = format!("/repos/{}/{}/commits/{}/check-runs", owner, repo, commit_sha);
        let mut runs = Vec::new();
        let mut total_count = 0;

        for page_num in 1..=MAX_PAGES {
            let page: CheckRunsPageDto = self
                .octocrab
                .get(&route, Some(&PageParams::page(page_num)))
                .await
                .with_context(|| {
                    format!(
                        "Failed to list check runs for {}/{} @ {}",
                        owner, repo, commit_sha
                    )
                })?;
            let page_is_empty = page.check_runs.is_empty();

            runs.extend(page.check_runs.into_iter().map(|run| CheckRun {
                id: run.id,
                name: run.name,
                status: convert_status_string(&run.status),
                conclusion: run.conclusion.as_deref().map(convert_conclusion_string),
            }));

            total_count = page.total_count;
            if page_is_empty || runs.len() as u64 >= total_count {
                break;
            }
        }

        ensure_complete_snapshot(runs.len(), total_count).with_context(|| {
            format!(
                "Incomplete check runs for {}/{} @ {}",
                owner, repo, commit_sha
            )
        })?;
        Ok(runs)
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        debug!("Fetching reviews for {}/{}#{}", owner, repo, pr_number);

        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let mut reviews = Vec::new();

        for page_num in 1..=MAX_PAGES {
            let page: Vec<ReviewDto> = self
                .octocrab
                .get(&route, Some(&PageParams::page(page_num)))
                .await
                .with_context(|| {
                    format!("Failed to list reviews for {}/{}#{}", owner, repo, pr_number)
                })?;
            let is_last = page.len() < PER_PAGE as usize;

            reviews.extend(page.into_iter().map(|r| Review {
                id: r.id,
                state: convert_review_state(&r.state),
                author_login: r.user.map(|u| u.login),
            }));

            if is_last {
                break;
            }
        }

        Ok(reviews)
    }

    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> anyhow::Result<()> {
        debug!(
            "Creating {:?} review on {}/{}#{}",
            event, owner, repo, pr_number
        );

        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, pr_number);
        let _: serde_json::Value = self
            .octocrab
            .post(route, Some(&CreateReviewBody { event, body }))
            .await
            .with_context(|| format!("Failed to create review on {}/{}#{}", owner, repo, pr_number))?;

        Ok(())
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<u64> {
        debug!("Commenting on {}/{}#{}: {}", owner, repo, pr_number, body);

        let comment = self
            .octocrab
            .issues(owner, repo)
            .create_comment(pr_number, body)
            .await
            .with_context(|| format!("Failed to comment on {}/{}#{}", owner, repo, pr_number))?;

        Ok(comment.id.0)
    }
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Closed) => PullRequestState::Closed,
        _ => PullRequestState::Open,
    };

    PullRequest {
        number: pr.number,
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "unknown".to_string()),
        state,
        merged: pr.merged_at.is_some() || pr.merged.unwrap_or(false),
        head_sha: pr.head.sha.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
    }
}

/// A snapshot that misses runs could look all-terminal, so it is an error
fn ensure_complete_snapshot(fetched: usize, total_count: u64) -> anyhow::Result<()> {
    anyhow::ensure!(
        fetched as u64 >= total_count,
        "fetched {} of {} check runs within {} pages",
        fetched,
        total_count,
        MAX_PAGES
    );
    Ok(())
}

/// Convert check run status string from GitHub API to our enum
///
/// Unrecognised statuses are treated as still pending so they never count
/// as terminal.
fn convert_status_string(status: &str) -> CheckRunStatus {
    match status.to_lowercase().as_str() {
        "completed" => CheckRunStatus::Completed,
        "in_progress" => CheckRunStatus::InProgress,
        "queued" => CheckRunStatus::Queued,
        "waiting" => CheckRunStatus::Waiting,
        "requested" => CheckRunStatus::Requested,
        _ => CheckRunStatus::Pending,
    }
}

/// Convert conclusion string from GitHub API to our enum
///
/// Unrecognised conclusions map to `Unknown`, which is not passing.
fn convert_conclusion_string(conclusion: &str) -> CheckConclusion {
    match conclusion.to_lowercase().as_str() {
        "success" => CheckConclusion::Success,
        "failure" => CheckConclusion::Failure,
        "neutral" => CheckConclusion::Neutral,
        "cancelled" => CheckConclusion::Cancelled,
        "skipped" => CheckConclusion::Skipped,
        "timed_out" => CheckConclusion::TimedOut,
        "action_required" => CheckConclusion::ActionRequired,
        "stale" => CheckConclusion::Stale,
        _ => CheckConclusion::Unknown,
    }
}

/// Convert review state string from GitHub API to our enum
fn convert_review_state(state: &str) -> ReviewState {
    match state.to_uppercase().as_str() {
        "APPROVED" => ReviewState::Approved,
        "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
        "DISMISSED" => ReviewState::Dismissed,
        "PENDING" => ReviewState::Pending,
        _ => ReviewState::Commented,
    }
}
