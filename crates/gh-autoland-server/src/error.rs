//! Webhook error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that end a webhook delivery with a non-2xx status
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The X-Hub-Signature-256 header is missing
    #[error("missing signature header")]
    MissingSignature,

    /// The signature header is not `sha256=<hex>`
    #[error("invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// HMAC verification failed
    #[error("invalid signature")]
    InvalidSignature,

    /// The X-GitHub-Event header is missing
    #[error("missing event type header")]
    MissingEventType,

    /// The request body is not a valid `pull_request` payload
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// At least one policy entry did not end acceptably
    #[error("workflow failed: {0}")]
    WorkflowFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// HTTP status for this error
    ///
    /// - signature problems: 401
    /// - malformed deliveries: 400
    /// - workflow and internal failures: 500
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignatureFormat(_) | Self::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            Self::MissingEventType | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::WorkflowFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Details stay in the log; the body never echoes secrets or remote errors
        let body = match &self {
            Self::MissingSignature => "Missing signature",
            Self::InvalidSignatureFormat(_) => "Invalid signature format",
            Self::InvalidSignature => "Invalid signature",
            Self::MissingEventType => "Missing event type",
            Self::InvalidPayload(_) => "Invalid payload",
            Self::WorkflowFailed(_) => "Workflow failed",
            Self::Internal(_) => "Internal server error",
        };

        (self.status_code(), body).into_response()
    }
}
