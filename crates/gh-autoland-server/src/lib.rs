//! Webhook front end for the autoland workflow
//!
//! Exposes `POST /event` for GitHub webhook deliveries. Each signed
//! `pull_request` delivery with a triggering action runs the workflow to
//! completion before the response is sent:
//! - `200` when every matching policy entry succeeded or the PR was not open
//! - `500` when any entry failed
//! - `401` / `400` for unsigned or malformed deliveries

pub mod config;
pub mod error;
pub mod signature;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use gh_autoland::{Orchestrator, PullRequestEvent, RunReport};
use gh_autoland_config::PolicyTable;
use gh_client::{DeadlineGitHubClient, OctocrabClient};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use config::ServerArgs;
pub use error::WebhookError;

/// Header naming the webhook event type
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the unique delivery id
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Shared state of the webhook router
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    webhook_secret: Arc<[u8]>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, webhook_secret: impl AsRef<[u8]>) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            webhook_secret: Arc::from(webhook_secret.as_ref()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/event", post(handle_event))
        .with_state(state)
}

/// Load the policy table, connect to GitHub and serve until Ctrl-C
pub async fn serve(args: ServerArgs) -> anyhow::Result<()> {
    if args.webhook_secret.is_empty() {
        anyhow::bail!("WEBHOOK_SECRET must not be empty");
    }

    let policies = PolicyTable::load(&args.config)?;
    if policies.is_empty() {
        warn!(
            "No policies in {}, every delivery will be acknowledged without action",
            args.config.display()
        );
    }

    let direct = OctocrabClient::with_token(args.user_token.clone(), args.github_api_url.as_deref())?;
    let client = DeadlineGitHubClient::new(direct, args.request_timeout());
    let orchestrator = Orchestrator::new(
        Arc::new(client),
        Arc::new(policies),
        args.workflow_settings(),
    );
    let app = build_router(AppState::new(orchestrator, args.webhook_secret.as_bytes()));

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!("Listening for webhooks on http://{}/event", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(err) => {
            error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}

async fn handle_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    let delivery = header_str(&headers, DELIVERY_HEADER)
        .ok()
        .flatten()
        .unwrap_or("unknown")
        .to_string();

    let signature = header_str(&headers, signature::SIGNATURE_HEADER)
        .map_err(|_| WebhookError::InvalidSignatureFormat("header is not ASCII".into()))?;
    signature::verify_signature(&state.webhook_secret, signature, &body).inspect_err(|err| {
        warn!("Rejected delivery {}: {}", delivery, err);
    })?;

    let event_type = header_str(&headers, EVENT_HEADER)
        .ok()
        .flatten()
        .ok_or(WebhookError::MissingEventType)?;
    if event_type != "pull_request" {
        debug!("Ignoring {} delivery {}", event_type, delivery);
        return Ok(StatusCode::OK);
    }

    let event = PullRequestEvent::from_webhook_payload(&body).map_err(|err| {
        warn!("Unparsable pull_request delivery {}: {}", delivery, err);
        WebhookError::InvalidPayload(err.to_string())
    })?;
    if !event.action.triggers_workflow() {
        debug!("{}: ignoring action {}", event, event.action.as_str());
        return Ok(StatusCode::OK);
    }

    info!(
        "{}: received {} (delivery {})",
        event,
        event.action.as_str(),
        delivery
    );
    let label = event.to_string();
    let report = run_workflow(Arc::clone(&state.orchestrator), event).await?;

    match report.first_failure() {
        None => Ok(StatusCode::OK),
        Some(run) => {
            error!("{}: delivery {} failed: {}", label, delivery, run.outcome);
            Err(WebhookError::WorkflowFailed(run.outcome.to_string()))
        }
    }
}

/// Run the workflow on its own task, cancelling it if the request is dropped
async fn run_workflow(
    orchestrator: Arc<Orchestrator>,
    event: PullRequestEvent,
) -> Result<RunReport, WebhookError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    tokio::spawn(async move { orchestrator.run(&event, &cancel).await })
        .await
        .map_err(|err| WebhookError::Internal(format!("workflow task failed: {err}")))
}

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: &str,
) -> Result<Option<&'a str>, axum::http::header::ToStrError> {
    headers.get(name).map(|value| value.to_str()).transpose()
}
