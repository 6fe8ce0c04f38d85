//! Verification stage
//!
//! Read-only checks run before anything is changed on the pull request:
//! - the PR is still open
//! - dependabot PRs only contain signed commits authored by dependabot
//! - all check runs on the head commit have finished
//!
//! The decision logic lives in pure functions so it can be tested without a
//! gateway; the async wrappers only fetch the data.

use crate::error::WorkflowError;
use crate::event::{PullRequestEvent, RepositoryRef};
use crate::stage::StageContext;
use gh_client::{CheckRun, PullRequestCommit, DEPENDABOT_LOGIN};
use log::{debug, warn};

/// State of a check-run snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksState {
    /// Every run is terminal (and passing, when that is required)
    Complete,
    /// At least one run is still queued or in progress
    Pending,
    /// Every run is terminal but at least one did not pass
    Failing,
}

/// Classify a snapshot of check runs
///
/// An empty snapshot counts as complete: there is nothing left to wait for.
pub fn checks_state(runs: &[CheckRun], require_passing_conclusion: bool) -> ChecksState {
    if runs.iter().any(|run| !run.is_terminal()) {
        return ChecksState::Pending;
    }
    if require_passing_conclusion && runs.iter().any(|run| !run.is_passing()) {
        return ChecksState::Failing;
    }
    ChecksState::Complete
}

/// Ensure every commit is signed and attributed to `login`
///
/// Returns the reason for the first offending commit.
pub fn verify_commit_authorship(commits: &[PullRequestCommit], login: &str) -> Result<(), String> {
    for commit in commits {
        if !commit.verified {
            return Err(format!("commit {} is not verified", commit.sha));
        }
        if commit.author_login.as_deref() != Some(login) {
            return Err(format!(
                "commit {} is authored by {} instead of {}",
                commit.sha,
                commit.author_login.as_deref().unwrap_or("an unknown user"),
                login
            ));
        }
    }
    Ok(())
}

/// Live read of the PR state
pub async fn check_open(
    ctx: &StageContext<'_>,
    event: &PullRequestEvent,
) -> Result<bool, WorkflowError> {
    let pr = ctx
        .remote(ctx.client.fetch_pull_request(
            &event.repository.owner,
            &event.repository.name,
            event.pull_request.number,
        ))
        .await?;

    debug!("{}: state={:?} merged={}", event, pr.state, pr.merged);
    Ok(pr.is_open())
}

/// Require dependabot PRs to consist solely of signed dependabot commits
///
/// PRs opened by anyone else pass without a remote call.
pub async fn verify_authorship(
    ctx: &StageContext<'_>,
    event: &PullRequestEvent,
) -> Result<(), WorkflowError> {
    if event.pull_request.author != DEPENDABOT_LOGIN {
        debug!(
            "{}: author {} is not dependabot, skipping commit verification",
            event, event.pull_request.author
        );
        return Ok(());
    }

    let commits = ctx
        .remote(ctx.client.fetch_pull_request_commits(
            &event.repository.owner,
            &event.repository.name,
            event.pull_request.number,
        ))
        .await?;

    verify_commit_authorship(&commits, DEPENDABOT_LOGIN).map_err(|reason| {
        warn!("{}: {}", event, reason);
        WorkflowError::AuthorshipVerificationFailed(reason)
    })
}

/// Poll check runs on `head_sha` until they are all terminal
///
/// Returns `Ok(false)` when the attempt budget runs out, which callers treat
/// as "needs remediation" rather than as an error. With
/// `require_passing_conclusion` a terminal but failing snapshot also returns
/// `Ok(false)`, without waiting for the remaining attempts.
pub async fn poll_checks_complete(
    ctx: &StageContext<'_>,
    repository: &RepositoryRef,
    head_sha: &str,
) -> Result<bool, WorkflowError> {
    let attempts = ctx.settings.poll_attempts;

    for attempt in 1..=attempts {
        let runs = ctx
            .remote(
                ctx.client
                    .fetch_check_runs(&repository.owner, &repository.name, head_sha),
            )
            .await?;

        match checks_state(&runs, ctx.settings.require_passing_conclusion) {
            ChecksState::Complete => {
                debug!(
                    "{}/{} @ {}: {} check runs complete after {} attempt(s)",
                    repository.owner,
                    repository.name,
                    head_sha,
                    runs.len(),
                    attempt
                );
                return Ok(true);
            }
            ChecksState::Failing => {
                warn!(
                    "{}/{} @ {}: check runs completed with failures",
                    repository.owner, repository.name, head_sha
                );
                return Ok(false);
            }
            ChecksState::Pending => {
                debug!(
                    "{}/{} @ {}: check runs pending (attempt {}/{})",
                    repository.owner, repository.name, head_sha, attempt, attempts
                );
            }
        }

        if attempt < attempts {
            ctx.pause(ctx.settings.poll_interval).await?;
        }
    }

    Ok(false)
}
