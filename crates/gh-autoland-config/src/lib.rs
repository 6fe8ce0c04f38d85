//! Configuration for gh-pr-autoland
//!
//! This crate provides:
//! - Per-repository policies (`Policy`, `PolicyTable`) loaded from YAML or TOML
//! - Workflow timing settings (`WorkflowSettings`)

pub mod policy;
pub mod settings;

pub use policy::{Policy, PolicyTable, DEFAULT_POLICY_FILE};
pub use settings::{
    WorkflowSettings, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY,
};
