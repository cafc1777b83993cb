// ABOUTME: Release driver capability and its helm CLI implementation.
// ABOUTME: Install/upgrade, uninstall, history and rollback of one release.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use super::command::{CommandRunner, CommandStatus, Phase};
use super::error::{DriverError, HistoryParseSnafu};
use super::render::RenderedManifest;
use crate::types::{ReleaseName, Revision};

/// Status the release driver gives to revisions replaced by a newer one.
pub const SUPERSEDED: &str = "superseded";

/// One revision of a release as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub revision: Revision,
    pub status: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub chart: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub description: String,
}

impl HistoryEntry {
    /// Whether this revision was a working release later replaced.
    pub fn is_superseded(&self) -> bool {
        self.status.eq_ignore_ascii_case(SUPERSEDED)
    }
}

/// Result of a history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub status: CommandStatus,
    /// Empty when the query failed.
    pub entries: Vec<HistoryEntry>,
}

/// Result of an install/upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutput {
    pub status: CommandStatus,
    /// Release as the driver would apply it; only set for dry runs.
    pub rendered: Option<String>,
}

/// Parameters of one install/upgrade.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    pub release: &'a ReleaseName,
    pub manifest: &'a RenderedManifest,
    pub dry_run: bool,
    /// Value overrides (`--set`).
    pub options: &'a BTreeMap<String, String>,
    /// How long the driver waits for the rollout; driver default when `None`.
    pub timeout: Option<Duration>,
}

/// Executes release operations against the cluster.
#[async_trait]
pub trait ReleaseDriver: Send + Sync {
    /// Install the release, or upgrade it if it exists. May block for as
    /// long as the driver waits for the rollout.
    async fn install(&self, request: &InstallRequest<'_>) -> Result<InstallOutput, DriverError>;

    async fn uninstall(&self, release: &ReleaseName) -> Result<CommandStatus, DriverError>;

    async fn history(&self, release: &ReleaseName) -> Result<History, DriverError>;

    async fn rollback(
        &self,
        release: &ReleaseName,
        revision: Revision,
    ) -> Result<CommandStatus, DriverError>;
}

/// [`ReleaseDriver`] backed by the `helm` command line.
#[derive(Debug, Clone)]
pub struct HelmCli {
    runner: CommandRunner,
}

impl HelmCli {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    /// Helm CLI from `KUBEB_HELM`, falling back to `helm` on the PATH.
    pub fn from_env(workdir: &Path) -> Self {
        Self::new(CommandRunner::from_env("KUBEB_HELM", "helm", workdir))
    }

    fn install_args(request: &InstallRequest<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "upgrade".into(),
            "--install".into(),
            "--force".into(),
            request.release.as_str().into(),
            "-f".into(),
            request.manifest.values_file.clone().into(),
            request.manifest.chart_dir.clone().into(),
            "--wait".into(),
        ];

        if let Some(timeout) = request.timeout {
            args.push("--timeout".into());
            args.push(helm_duration(timeout).into());
        }

        if !request.options.is_empty() {
            let set = request
                .options
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(",");
            args.push("--set".into());
            args.push(set.into());
        }

        if request.dry_run {
            args.push("--dry-run".into());
            args.push("--debug".into());
        }

        args
    }
}

#[async_trait]
impl ReleaseDriver for HelmCli {
    async fn install(&self, request: &InstallRequest<'_>) -> Result<InstallOutput, DriverError> {
        let output = self
            .runner
            .run(Phase::Install, Self::install_args(request))
            .await?;
        let rendered = request.dry_run.then_some(output.stdout);
        Ok(InstallOutput {
            status: output.status,
            rendered,
        })
    }

    async fn uninstall(&self, release: &ReleaseName) -> Result<CommandStatus, DriverError> {
        let output = self
            .runner
            .run(Phase::Uninstall, ["uninstall", release.as_str()])
            .await?;
        Ok(output.status)
    }

    async fn history(&self, release: &ReleaseName) -> Result<History, DriverError> {
        let output = self
            .runner
            .run(
                Phase::History,
                ["history", release.as_str(), "--output", "json"],
            )
            .await?;

        if !output.success() {
            return Ok(History {
                status: output.status,
                entries: Vec::new(),
            });
        }

        Ok(History {
            status: output.status,
            entries: parse_history(&output.stdout)?,
        })
    }

    async fn rollback(
        &self,
        release: &ReleaseName,
        revision: Revision,
    ) -> Result<CommandStatus, DriverError> {
        let revision = revision.to_string();
        let output = self
            .runner
            .run(Phase::Rollback, ["rollback", release.as_str(), revision.as_str()])
            .await?;
        Ok(output.status)
    }
}

/// Go duration for `--timeout`: whole seconds when exact, else milliseconds
/// rounded up so a short timeout never becomes zero.
fn helm_duration(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        return format!("{}s", timeout.as_secs());
    }
    let millis = timeout.as_nanos().div_ceil(1_000_000);
    format!("{millis}ms")
}

/// Parse `helm history --output json`.
pub fn parse_history(json: &str) -> Result<Vec<HistoryEntry>, DriverError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).context(HistoryParseSnafu)
}
