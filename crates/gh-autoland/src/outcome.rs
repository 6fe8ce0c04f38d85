//! Terminal outcomes and the progress trail of a run

use crate::error::WorkflowError;
use gh_autoland_config::Policy;
use std::fmt;

/// Terminal result of one policy entry for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Success,
    SkippedNotOpen,
    FailedVerification(String),
    FailedChecks,
    RemoteError(String),
}

impl WorkflowOutcome {
    /// Outcomes that let the delivery be acknowledged as handled
    pub fn is_acceptable(&self) -> bool {
        matches!(
            self,
            WorkflowOutcome::Success | WorkflowOutcome::SkippedNotOpen
        )
    }
}

impl From<WorkflowError> for WorkflowOutcome {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotOpen => WorkflowOutcome::SkippedNotOpen,
            WorkflowError::AuthorshipVerificationFailed(reason) => {
                WorkflowOutcome::FailedVerification(reason)
            }
            WorkflowError::ChecksIncomplete => WorkflowOutcome::FailedChecks,
            other @ (WorkflowError::RemoteCallFailed(_) | WorkflowError::Cancelled) => {
                WorkflowOutcome::RemoteError(other.to_string())
            }
        }
    }
}

impl fmt::Display for WorkflowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowOutcome::Success => write!(f, "success"),
            WorkflowOutcome::SkippedNotOpen => write!(f, "skipped, pull request not open"),
            WorkflowOutcome::FailedVerification(reason) => {
                write!(f, "verification failed: {}", reason)
            }
            WorkflowOutcome::FailedChecks => write!(f, "checks incomplete"),
            WorkflowOutcome::RemoteError(message) => write!(f, "{}", message),
        }
    }
}

/// A completed step of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Settled,
    VerifiedOpen,
    VerifiedAuthorship,
    RequestedRebase,
    VerifiedChecks,
    Approved,
    RequestedMerge,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Settled => "settled",
            Stage::VerifiedOpen => "verified open",
            Stage::VerifiedAuthorship => "verified dependabot",
            Stage::RequestedRebase => "rebased PR",
            Stage::VerifiedChecks => "verified checks",
            Stage::Approved => "approved PR",
            Stage::RequestedMerge => "merged PR",
        }
    }
}

/// Result of applying one policy entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRun {
    pub policy: Policy,
    pub outcome: WorkflowOutcome,
    /// Completed stages, in order
    pub trail: Vec<Stage>,
}

/// Everything that happened while processing one event
///
/// Empty when no policy entry matched the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub runs: Vec<PolicyRun>,
}

impl RunReport {
    pub fn matched_policy(&self) -> bool {
        !self.runs.is_empty()
    }

    /// True when every processed entry ended acceptably
    pub fn is_success(&self) -> bool {
        self.runs.iter().all(|run| run.outcome.is_acceptable())
    }

    /// First entry that did not end acceptably
    pub fn first_failure(&self) -> Option<&PolicyRun> {
        self.runs.iter().find(|run| !run.outcome.is_acceptable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(outcome: WorkflowOutcome) -> PolicyRun {
        PolicyRun {
            policy: Policy::new("api", true, true),
            outcome,
            trail: vec![],
        }
    }

    #[test]
    fn test_error_to_outcome() {
        assert_eq!(
            WorkflowOutcome::from(WorkflowError::NotOpen),
            WorkflowOutcome::SkippedNotOpen
        );
        assert_eq!(
            WorkflowOutcome::from(WorkflowError::ChecksIncomplete),
            WorkflowOutcome::FailedChecks
        );
        assert_eq!(
            WorkflowOutcome::from(WorkflowError::Cancelled),
            WorkflowOutcome::RemoteError("workflow cancelled".to_string())
        );
        assert!(matches!(
            WorkflowOutcome::from(WorkflowError::AuthorshipVerificationFailed("x".into())),
            WorkflowOutcome::FailedVerification(reason) if reason == "x"
        ));
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = RunReport::default();
        assert!(!report.matched_policy());
        assert!(report.is_success());
        assert!(report.first_failure().is_none());
    }

    #[test]
    fn test_report_fails_on_any_bad_entry() {
        let report = RunReport {
            runs: vec![
                run(WorkflowOutcome::Success),
                run(WorkflowOutcome::SkippedNotOpen),
            ],
        };
        assert!(report.is_success());

        let report = RunReport {
            runs: vec![run(WorkflowOutcome::Success), run(WorkflowOutcome::FailedChecks)],
        };
        assert!(!report.is_success());
        assert_eq!(
            report.first_failure().unwrap().outcome,
            WorkflowOutcome::FailedChecks
        );
    }
}
