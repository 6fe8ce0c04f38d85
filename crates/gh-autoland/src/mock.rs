//! Recording gateway mock shared by the unit tests

use crate::event::{PullRequestAction, PullRequestEvent, PullRequestRef, RepositoryRef};
use async_trait::async_trait;
use gh_client::{
    CheckConclusion, CheckRun, CheckRunStatus, Directive, GitHubClient, PullRequest,
    PullRequestCommit, PullRequestState, Review, ReviewEvent, ReviewState,
};
use std::sync::{Arc, Mutex};

/// A gateway call as observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetPullRequest,
    ListCommits,
    ListCheckRuns,
    ListReviews,
    CreateReview(ReviewEvent),
    Comment(String),
}

#[derive(Debug)]
struct MockState {
    open: bool,
    commits: Vec<PullRequestCommit>,
    /// Snapshot returned by the n-th poll; the last one repeats
    check_snapshots: Vec<Vec<CheckRun>>,
    /// Snapshot returned once a rebase was requested
    after_rebase: Option<Vec<CheckRun>>,
    reviews: Vec<Review>,
    failing_on: Option<&'static str>,
    calls: Vec<Call>,
}

/// Mock client for testing
#[derive(Debug, Clone)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    /// Open PR, no commits, all checks complete, no reviews
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                open: true,
                commits: vec![],
                check_snapshots: vec![vec![check(
                    CheckRunStatus::Completed,
                    Some(CheckConclusion::Success),
                )]],
                after_rebase: None,
                reviews: vec![],
                failing_on: None,
                calls: vec![],
            })),
        }
    }

    pub fn closed(self) -> Self {
        self.state.lock().unwrap().open = false;
        self
    }

    pub fn with_commits(self, commits: Vec<PullRequestCommit>) -> Self {
        self.state.lock().unwrap().commits = commits;
        self
    }

    pub fn with_check_snapshots(self, snapshots: Vec<Vec<CheckRun>>) -> Self {
        self.state.lock().unwrap().check_snapshots = snapshots;
        self
    }

    pub fn with_checks_after_rebase(self, runs: Vec<CheckRun>) -> Self {
        self.state.lock().unwrap().after_rebase = Some(runs);
        self
    }

    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        self.state.lock().unwrap().reviews = reviews;
        self
    }

    /// Make the named gateway operation fail
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.state.lock().unwrap().failing_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    /// Number of mutating calls (reviews and comments)
    pub fn mutations(&self) -> usize {
        self.count(|c| matches!(c, Call::CreateReview(_) | Call::Comment(_)))
    }

    fn record(&self, operation: &'static str, call: Call) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing_on == Some(operation) {
            anyhow::bail!("{} failed: 502 Bad Gateway", operation);
        }
        Ok(())
    }
}

#[async_trait]
impl GitHubClient for MockClient {
    async fn fetch_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        self.record("GetPullRequest", Call::GetPullRequest)?;
        let open = self.state.lock().unwrap().open;
        Ok(PullRequest {
            number: pr_number,
            author: gh_client::DEPENDABOT_LOGIN.to_string(),
            state: if open {
                PullRequestState::Open
            } else {
                PullRequestState::Closed
            },
            merged: false,
            head_sha: "abc123".to_string(),
            html_url: format!("https://github.com/octo-org/api/pull/{}", pr_number),
        })
    }

    async fn fetch_pull_request_commits(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
    ) -> anyhow::Result<Vec<PullRequestCommit>> {
        self.record("ListCommits", Call::ListCommits)?;
        Ok(self.state.lock().unwrap().commits.clone())
    }

    async fn fetch_check_runs(
        &self,
        _owner: &str,
        _repo: &str,
        _commit_sha: &str,
    ) -> anyhow::Result<Vec<CheckRun>> {
        self.record("ListCheckRunsForRef", Call::ListCheckRuns)?;
        let state = self.state.lock().unwrap();

        let rebased = state
            .calls
            .iter()
            .any(|c| *c == Call::Comment(Directive::Rebase.comment_body().to_string()));
        if rebased {
            if let Some(runs) = &state.after_rebase {
                return Ok(runs.clone());
            }
        }

        let polls = state
            .calls
            .iter()
            .filter(|c| matches!(c, Call::ListCheckRuns))
            .count();
        let index = (polls - 1).min(state.check_snapshots.len().saturating_sub(1));
        Ok(state.check_snapshots.get(index).cloned().unwrap_or_default())
    }

    async fn fetch_reviews(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        self.record("ListReviews", Call::ListReviews)?;
        Ok(self.state.lock().unwrap().reviews.clone())
    }

    async fn create_review(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
        event: ReviewEvent,
        _body: Option<&str>,
    ) -> anyhow::Result<()> {
        self.record("CreateReview", Call::CreateReview(event))
    }

    async fn create_issue_comment(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
        body: &str,
    ) -> anyhow::Result<u64> {
        self.record("CreateIssueComment", Call::Comment(body.to_string()))?;
        Ok(12345) // Mock comment ID
    }
}

pub fn check(status: CheckRunStatus, conclusion: Option<CheckConclusion>) -> CheckRun {
    CheckRun {
        id: 1,
        name: "build".to_string(),
        status,
        conclusion,
    }
}

pub fn commit(sha: &str, author: Option<&str>, verified: bool) -> PullRequestCommit {
    PullRequestCommit {
        sha: sha.to_string(),
        author_login: author.map(str::to_string),
        verified,
    }
}

pub fn review(state: ReviewState) -> Review {
    Review {
        id: 1,
        state,
        author_login: Some("maintainer".to_string()),
    }
}

/// `opened` event on octo-org/api#17
pub fn event_by(author: &str) -> PullRequestEvent {
    PullRequestEvent {
        action: PullRequestAction::Opened,
        repository: RepositoryRef {
            owner: "octo-org".to_string(),
            name: "api".to_string(),
        },
        pull_request: PullRequestRef {
            number: 17,
            author: author.to_string(),
            head_sha: "abc123".to_string(),
            html_url: "https://github.com/octo-org/api/pull/17".to_string(),
        },
    }
}
