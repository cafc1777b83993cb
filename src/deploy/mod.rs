// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers and Deployment struct for compile-time safe deployments.

mod deployment;
mod error;
mod orchestrator;
mod rollback;
mod state;
mod transitions;

pub use deployment::{DeployReport, Deployment};
pub use error::DeployError;
pub use orchestrator::{DeployRequest, Orchestrator, VersionSelector};
pub use rollback::{RollbackOutcome, last_known_good, manual_rollback, select_rollback_revision};
pub use state::{Failed, Installed, Rendered, Resolved};
pub use transitions::{ManifestSource, TransitionResult};
