//! Autoland workflow for dependabot pull requests
//!
//! Given a pull request webhook event and the configured policy table, the
//! workflow decides whether the PR is safe to land and, per policy, approves
//! it and asks dependabot to merge it.
//!
//! # Architecture
//!
//! ```text
//! PullRequestEvent ──► Orchestrator ──► verification ──► remediation
//!                           │              (read-only)     (comments, reviews)
//!                           ▼
//!                       RunReport
//! ```
//!
//! All remote access goes through the `GitHubClient` trait from `gh-client`,
//! so the workflow is driven by a mock in tests.

pub mod error;
pub mod event;
pub mod orchestrator;
pub mod outcome;
pub mod remediation;
pub mod stage;
pub mod verification;

#[cfg(test)]
mod mock;

pub use error::WorkflowError;
pub use event::{PullRequestAction, PullRequestEvent, PullRequestRef, RepositoryRef};
pub use orchestrator::Orchestrator;
pub use outcome::{PolicyRun, RunReport, Stage, WorkflowOutcome};
pub use remediation::Approval;
pub use stage::StageContext;
pub use verification::ChecksState;
