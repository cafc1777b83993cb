// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::driver::{InstallRequest, ManifestRenderer, ReleaseDriver, RenderError, RenderRequest};
use crate::template::Template;
use crate::types::ImageName;

use super::deployment::{DeployReport, Deployment};
use super::error::DeployError;
use super::rollback::{RollbackOutcome, last_known_good};
use super::state::{Failed, Installed, Rendered, Resolved};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

/// Render inputs other than the version, which the deployment carries.
#[derive(Debug, Clone, Copy)]
pub struct ManifestSource<'a> {
    pub template: &'a Template,
    pub image: &'a ImageName,
    /// Effective variables of the current environment.
    pub variables: &'a BTreeMap<String, String>,
    pub env_file: &'a Path,
}

impl<S> Deployment<S> {
    fn map_state<T>(self, f: impl FnOnce(S) -> T) -> Deployment<T> {
        Deployment {
            release: self.release,
            version: self.version,
            dry_run: self.dry_run,
            options: self.options,
            state: f(self.state),
        }
    }
}

// =============================================================================
// Resolved -> Rendered
// =============================================================================

impl Deployment<Resolved> {
    /// Render the manifest for this deployment's version.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error; nothing has been installed yet, so
    /// there is nothing to roll back.
    pub fn render<R: ManifestRenderer + ?Sized>(
        self,
        renderer: &R,
        source: &ManifestSource<'_>,
    ) -> Result<Deployment<Rendered>, RenderError> {
        let manifest = renderer.render(&RenderRequest {
            template: source.template,
            image: source.image,
            tag: &self.version.tag,
            variables: source.variables,
            env_file: source.env_file,
        })?;
        Ok(self.map_state(|Resolved| Rendered { manifest }))
    }
}

// =============================================================================
// Rendered -> Installed | Failed
// =============================================================================

impl Deployment<Rendered> {
    /// Install or upgrade the release. Blocks until the driver returns.
    ///
    /// # Errors
    ///
    /// Returns `(failed, error)` so the caller can roll back.
    pub async fn install<D: ReleaseDriver + ?Sized>(
        self,
        driver: &D,
        timeout: Option<Duration>,
    ) -> TransitionResult<Installed, Failed> {
        let result = driver
            .install(&InstallRequest {
                release: &self.release,
                manifest: &self.state.manifest,
                dry_run: self.dry_run,
                options: &self.options,
                timeout,
            })
            .await;

        let error = match result {
            Ok(output) if output.status.success() => {
                return Ok(self.map_state(|Rendered { manifest }| Installed {
                    manifest,
                    rendered: output.rendered,
                }));
            }
            Ok(output) => DeployError::InstallFailed {
                status: output.status,
            },
            Err(e) => DeployError::Driver(e),
        };
        Err((
            self.map_state(|Rendered { manifest }| Failed { manifest }),
            error,
        ))
    }
}

// =============================================================================
// Failed - rollback
// =============================================================================

impl Deployment<Failed> {
    /// Roll the release back to its last known-good revision.
    ///
    /// Consumes the deployment, so a failed install is rolled back at most
    /// once. Dry runs never touch the cluster and are not rolled back.
    pub async fn rollback<D: ReleaseDriver + ?Sized>(self, driver: &D) -> RollbackOutcome {
        if self.dry_run {
            return RollbackOutcome::Skipped;
        }

        let revision = match last_known_good(driver, &self.release).await {
            Ok(Some(revision)) => revision,
            Ok(None) => return RollbackOutcome::Unavailable,
            Err(e) => return RollbackOutcome::Aborted(e.to_string()),
        };

        tracing::info!("Rolling {} back to revision {}", self.release, revision);
        match driver.rollback(&self.release, revision).await {
            Ok(status) => RollbackOutcome::Attempted { revision, status },
            Err(e) => RollbackOutcome::Aborted(e.to_string()),
        }
    }
}

// =============================================================================
// Installed - terminal state
// =============================================================================

impl Deployment<Installed> {
    /// Consume the deployment and report what was deployed.
    pub fn finish(self) -> DeployReport {
        DeployReport {
            version: self.version,
            rendered: self.state.rendered,
        }
    }
}
