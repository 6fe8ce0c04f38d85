//! Remediation stage: rebase, approve, merge
//!
//! Rebase and merge are delegated to dependabot through PR comments; this
//! crate never calls the merge or update-branch endpoints itself.

use crate::error::WorkflowError;
use crate::event::PullRequestEvent;
use crate::stage::StageContext;
use gh_client::{Directive, ReviewEvent, ReviewState};
use log::{debug, info};

/// Whether `approve` had to submit a review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Submitted,
    AlreadyApproved,
}

/// Ask dependabot to rebase the PR branch
///
/// Fire-and-forget: the effect is observed by the next check-run poll.
pub async fn request_rebase(
    ctx: &StageContext<'_>,
    event: &PullRequestEvent,
) -> Result<(), WorkflowError> {
    post(ctx, event, Directive::Rebase).await
}

/// Approve the PR unless an approving review already exists
pub async fn approve(
    ctx: &StageContext<'_>,
    event: &PullRequestEvent,
) -> Result<Approval, WorkflowError> {
    let owner = &event.repository.owner;
    let repo = &event.repository.name;
    let number = event.pull_request.number;

    let reviews = ctx
        .remote(ctx.client.fetch_reviews(owner, repo, number))
        .await?;
    if reviews
        .iter()
        .any(|review| review.state == ReviewState::Approved)
    {
        debug!("{}: already approved, not submitting another review", event);
        return Ok(Approval::AlreadyApproved);
    }

    ctx.remote(
        ctx.client
            .create_review(owner, repo, number, ReviewEvent::Approve, None),
    )
    .await?;
    Ok(Approval::Submitted)
}

/// Ask dependabot to merge the PR
///
/// Branch protection is enforced by GitHub when dependabot acts on it.
pub async fn merge(ctx: &StageContext<'_>, event: &PullRequestEvent) -> Result<(), WorkflowError> {
    post(ctx, event, Directive::Merge).await
}

async fn post(
    ctx: &StageContext<'_>,
    event: &PullRequestEvent,
    directive: Directive,
) -> Result<(), WorkflowError> {
    ctx.remote(ctx.client.post_directive(
        &event.repository.owner,
        &event.repository.name,
        event.pull_request.number,
        directive,
    ))
    .await?;
    info!("{}: posted '{}'", event, directive.comment_body());
    Ok(())
}
