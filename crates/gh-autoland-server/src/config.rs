//! Command line and environment configuration

use clap::Parser;
use gh_autoland_config::{
    WorkflowSettings, DEFAULT_POLICY_FILE, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
    DEFAULT_SETTLE_DELAY,
};
use gh_client::DEFAULT_CALL_DEADLINE;
use std::path::PathBuf;
use std::time::Duration;

/// Autoland dependabot pull requests from GitHub webhook deliveries
#[derive(Debug, Clone, Parser)]
#[command(name = "gh-pr-autoland", version, about)]
pub struct ServerArgs {
    /// Policy file (YAML, or TOML when the extension is .toml)
    #[arg(long, env = "AUTOLAND_CONFIG", default_value = DEFAULT_POLICY_FILE)]
    pub config: PathBuf,

    /// Address the webhook listener binds to
    #[arg(long, env = "AUTOLAND_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Seconds to wait before verifying a pull request
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY.as_secs())]
    pub settle_delay_secs: u64,

    /// Seconds between two check-run polls
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    pub poll_interval_secs: u64,

    /// Check-run polls per verification pass
    #[arg(long, default_value_t = DEFAULT_POLL_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub poll_attempts: u32,

    /// Only treat check runs as complete when they passed
    #[arg(long)]
    pub require_passing_conclusion: bool,

    /// Deadline for a single GitHub API call, in seconds
    #[arg(long, default_value_t = DEFAULT_CALL_DEADLINE.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// GitHub API base URL, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// Secret shared with the GitHub webhook
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: String,

    /// Token used to comment on and review pull requests
    #[arg(long, env = "USER_TOKEN", hide_env_values = true)]
    pub user_token: String,
}

impl ServerArgs {
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            settle_delay: Duration::from_secs(self.settle_delay_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            poll_attempts: self.poll_attempts,
            require_passing_conclusion: self.require_passing_conclusion,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = [
        "gh-pr-autoland",
        "--webhook-secret",
        "s3cret",
        "--user-token",
        "ghp_token",
    ];

    #[test]
    fn test_defaults_match_workflow_defaults() {
        let args = ServerArgs::try_parse_from(REQUIRED).unwrap();

        assert_eq!(args.workflow_settings(), WorkflowSettings::default());
        assert_eq!(args.request_timeout(), DEFAULT_CALL_DEADLINE);
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert_eq!(args.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let mut argv = REQUIRED.to_vec();
        argv.extend([
            "--config",
            "/etc/autoland/policy.toml",
            "--settle-delay-secs",
            "0",
            "--poll-interval-secs",
            "5",
            "--poll-attempts",
            "3",
            "--require-passing-conclusion",
        ]);
        let args = ServerArgs::try_parse_from(argv).unwrap();
        let settings = args.workflow_settings();

        assert_eq!(settings.settle_delay, Duration::ZERO);
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.poll_attempts, 3);
        assert!(settings.require_passing_conclusion);
        assert_eq!(args.config, PathBuf::from("/etc/autoland/policy.toml"));
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        let mut argv = REQUIRED.to_vec();
        argv.extend(["--poll-attempts", "0"]);
        assert!(ServerArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let mut argv = REQUIRED.to_vec();
        argv.extend(["--request-timeout-secs", "0"]);
        assert!(ServerArgs::try_parse_from(argv).is_err());

        let mut argv = REQUIRED.to_vec();
        argv.extend(["--request-timeout-secs", "5"]);
        let args = ServerArgs::try_parse_from(argv).unwrap();
        assert_eq!(args.request_timeout(), Duration::from_secs(5));
    }
}
