//! Workflow timing settings

use std::time::Duration;

/// Default wait before verification starts
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(15);

/// Default wait between check-run polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default number of check-run polls per verification pass
pub const DEFAULT_POLL_ATTEMPTS: u32 = 12;

/// Timing and strictness knobs for the autoland workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Wait before verification so GitHub can register checks on the head commit
    pub settle_delay: Duration,

    /// Wait between two check-run polls
    pub poll_interval: Duration,

    /// Polls per verification pass
    pub poll_attempts: u32,

    /// Treat completed-but-failing check runs as not complete
    pub require_passing_conclusion: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            require_passing_conclusion: false,
        }
    }
}

impl WorkflowSettings {
    /// Settings with no waiting at all
    pub fn immediate() -> Self {
        Self {
            settle_delay: Duration::ZERO,
            poll_interval: Duration::ZERO,
            ..Self::default()
        }
    }
}
