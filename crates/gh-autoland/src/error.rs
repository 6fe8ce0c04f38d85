//! Workflow error taxonomy

use thiserror::Error;

/// Why a policy run stopped before completing
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The pull request was closed or merged before processing
    #[error("pull request is not open")]
    NotOpen,

    /// Commit authorship or signature did not match dependabot
    #[error("authorship verification failed: {0}")]
    AuthorshipVerificationFailed(String),

    /// Check runs were still incomplete after the rebase cycle
    #[error("check runs did not complete")]
    ChecksIncomplete,

    /// Any GitHub API failure: transport, auth, rate limit, deadline
    #[error("remote call failed: {0:#}")]
    RemoteCallFailed(anyhow::Error),

    /// The delivery was abandoned while the workflow was running
    #[error("workflow cancelled")]
    Cancelled,
}

impl WorkflowError {
    /// Whether the remaining policy entries for the event must be skipped too
    ///
    /// After a failed remote call the remote state is unknown, so nothing
    /// further is attempted for the event.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            WorkflowError::RemoteCallFailed(_) | WorkflowError::Cancelled
        )
    }
}
