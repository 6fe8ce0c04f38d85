//! Shared plumbing for verification and remediation steps
//!
//! Every wait and every remote call races against the delivery's
//! cancellation token.

use crate::error::WorkflowError;
use gh_autoland_config::WorkflowSettings;
use gh_client::GitHubClient;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Collaborators a single step needs
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub client: &'a dyn GitHubClient,
    pub settings: &'a WorkflowSettings,
    pub cancel: &'a CancellationToken,
}

impl<'a> StageContext<'a> {
    pub fn new(
        client: &'a dyn GitHubClient,
        settings: &'a WorkflowSettings,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            client,
            settings,
            cancel,
        }
    }

    /// Await a gateway call, unless the delivery is cancelled first
    pub async fn remote<T>(
        &self,
        call: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, WorkflowError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WorkflowError::Cancelled),
            result = call => result.map_err(WorkflowError::RemoteCallFailed),
        }
    }

    /// Sleep for `duration`, unless the delivery is cancelled first
    pub async fn pause(&self, duration: Duration) -> Result<(), WorkflowError> {
        if self.cancel.is_cancelled() {
            return Err(WorkflowError::Cancelled);
        }
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WorkflowError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
