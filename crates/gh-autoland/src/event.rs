//! Pull request lifecycle events
//!
//! The workflow only ever reads these; they are built once from the webhook
//! payload and dropped when the run ends.

use serde::Deserialize;
use std::fmt;

/// Repository an event belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

/// Pull request snapshot carried by the event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub number: u64,
    pub author: String,
    pub head_sha: String,
    pub html_url: String,
}

/// What happened to the pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Synchronize,
    Reopened,
    Other(String),
}

impl PullRequestAction {
    /// Only new or updated pull requests are worth verifying
    pub fn triggers_workflow(&self) -> bool {
        matches!(
            self,
            PullRequestAction::Opened | PullRequestAction::Synchronize | PullRequestAction::Reopened
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            PullRequestAction::Opened => "opened",
            PullRequestAction::Synchronize => "synchronize",
            PullRequestAction::Reopened => "reopened",
            PullRequestAction::Other(action) => action,
        }
    }
}

impl From<&str> for PullRequestAction {
    fn from(action: &str) -> Self {
        match action {
            "opened" => PullRequestAction::Opened,
            "synchronize" => PullRequestAction::Synchronize,
            "reopened" => PullRequestAction::Reopened,
            other => PullRequestAction::Other(other.to_string()),
        }
    }
}

/// A `pull_request` webhook delivery, reduced to what the workflow needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub repository: RepositoryRef,
    pub pull_request: PullRequestRef,
}

impl PullRequestEvent {
    /// Parse the JSON body of a `pull_request` webhook delivery
    pub fn from_webhook_payload(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload: PullRequestPayload = serde_json::from_slice(body)?;
        Ok(payload.into())
    }
}

/// Renders as `owner/repo#number`, used as log prefix
impl fmt::Display for PullRequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}#{}",
            self.repository.owner, self.repository.name, self.pull_request.number
        )
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestBodyPayload {
    number: u64,
    #[serde(default)]
    html_url: String,
    user: LoginPayload,
    head: HeadPayload,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: LoginPayload,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    action: String,
    pull_request: PullRequestBodyPayload,
    repository: RepositoryPayload,
}

impl From<PullRequestPayload> for PullRequestEvent {
    fn from(payload: PullRequestPayload) -> Self {
        Self {
            action: PullRequestAction::from(payload.action.as_str()),
            repository: RepositoryRef {
                owner: payload.repository.owner.login,
                name: payload.repository.name,
            },
            pull_request: PullRequestRef {
                number: payload.pull_request.number,
                author: payload.pull_request.user.login,
                head_sha: payload.pull_request.head.sha,
                html_url: payload.pull_request.html_url,
            },
        }
    }
}
