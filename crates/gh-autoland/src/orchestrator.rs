//! Orchestrator - sequences verification and remediation per policy entry
//!
//! For every policy entry matching the event's repository:
//!
//! ```text
//! settle ─► open? ─► authorship ─► checks complete? ──yes──► approve? ─► merge?
//!                                        │                      ▲
//!                                        no                     │
//!                                        ▼                      │
//!                                     rebase ─► checks complete? ┘ (no: FailedChecks)
//! ```
//!
//! Verification failures end the current entry only. A failed remote call or
//! a cancelled delivery ends the whole run.

use crate::error::WorkflowError;
use crate::event::PullRequestEvent;
use crate::outcome::{PolicyRun, RunReport, Stage, WorkflowOutcome};
use crate::remediation::{self, Approval};
use crate::stage::StageContext;
use crate::verification;
use gh_autoland_config::{Policy, PolicyTable, WorkflowSettings};
use gh_client::GitHubClient;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Stateless workflow engine shared by all deliveries
#[derive(Clone)]
pub struct Orchestrator {
    client: Arc<dyn GitHubClient>,
    policies: Arc<PolicyTable>,
    settings: WorkflowSettings,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn GitHubClient>,
        policies: Arc<PolicyTable>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            client,
            policies,
            settings,
        }
    }

    /// Apply every matching policy entry to the event
    pub async fn run(&self, event: &PullRequestEvent, cancel: &CancellationToken) -> RunReport {
        let mut report = RunReport::default();

        for policy in self.policies.matching(&event.repository.name) {
            info!(
                "{}: running action (autoapprove={}, automerge={}, url={})",
                event, policy.autoapprove, policy.automerge, event.pull_request.html_url
            );

            let mut trail = Vec::new();
            let result = self.run_policy(policy, event, cancel, &mut trail).await;
            let aborts_run = matches!(&result, Err(err) if err.aborts_run());

            let outcome = match result {
                Ok(()) => WorkflowOutcome::Success,
                Err(err) => WorkflowOutcome::from(err),
            };
            match &outcome {
                WorkflowOutcome::Success => info!("{}: workflow succeeded", event),
                WorkflowOutcome::SkippedNotOpen => info!("{}: {}", event, outcome),
                WorkflowOutcome::RemoteError(_) => error!("{}: {}", event, outcome),
                _ => warn!("{}: {}", event, outcome),
            }

            report.runs.push(PolicyRun {
                policy: policy.clone(),
                outcome,
                trail,
            });

            if aborts_run {
                break;
            }
        }

        if !report.matched_policy() {
            debug!(
                "{}: no policy for repository {}",
                event, event.repository.name
            );
        }
        report
    }

    async fn run_policy(
        &self,
        policy: &Policy,
        event: &PullRequestEvent,
        cancel: &CancellationToken,
        trail: &mut Vec<Stage>,
    ) -> Result<(), WorkflowError> {
        let ctx = StageContext::new(self.client.as_ref(), &self.settings, cancel);
        let mut complete = |stage: Stage| {
            info!("{}: {}", event, stage.as_str());
            trail.push(stage);
        };

        ctx.pause(self.settings.settle_delay).await?;
        complete(Stage::Settled);

        if !verification::check_open(&ctx, event).await? {
            return Err(WorkflowError::NotOpen);
        }
        complete(Stage::VerifiedOpen);

        verification::verify_authorship(&ctx, event).await?;
        complete(Stage::VerifiedAuthorship);

        let head_sha = &event.pull_request.head_sha;
        if !verification::poll_checks_complete(&ctx, &event.repository, head_sha).await? {
            remediation::request_rebase(&ctx, event).await?;
            complete(Stage::RequestedRebase);

            if !verification::poll_checks_complete(&ctx, &event.repository, head_sha).await? {
                return Err(WorkflowError::ChecksIncomplete);
            }
        }
        complete(Stage::VerifiedChecks);

        if policy.autoapprove {
            if remediation::approve(&ctx, event).await? == Approval::AlreadyApproved {
                debug!("{}: approval already present", event);
            }
            complete(Stage::Approved);
        }

        if policy.automerge {
            remediation::merge(&ctx, event).await?;
            complete(Stage::RequestedMerge);
        }

        Ok(())
    }
}
