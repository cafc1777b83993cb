// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: Holds the release, the resolved build and the install parameters.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::driver::RenderedManifest;
use crate::ledger::BuildVersion;
use crate::types::{ReleaseName, VersionTag};

use super::state::{Failed, Installed, Rendered, Resolved};

/// Outcome of a successful deploy or dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    #[serde(flatten)]
    pub version: BuildVersion,
    /// Release as the driver rendered it; only present for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data, so the
/// rendered manifest only exists once rendering has happened.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) release: ReleaseName,
    pub(crate) version: BuildVersion,
    pub(crate) dry_run: bool,
    pub(crate) options: BTreeMap<String, String>,
    pub(crate) state: S,
}

impl Deployment<Resolved> {
    pub fn new(
        release: ReleaseName,
        version: BuildVersion,
        dry_run: bool,
        options: BTreeMap<String, String>,
    ) -> Self {
        Deployment {
            release,
            version,
            dry_run,
            options,
            state: Resolved,
        }
    }
}

impl<S> Deployment<S> {
    pub fn release(&self) -> &ReleaseName {
        &self.release
    }

    pub fn version(&self) -> &BuildVersion {
        &self.version
    }

    pub fn tag(&self) -> &VersionTag {
        &self.version.tag
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Value overrides passed to the release driver.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }
}

impl Deployment<Rendered> {
    pub fn manifest(&self) -> &RenderedManifest {
        &self.state.manifest
    }
}

impl Deployment<Installed> {
    pub fn manifest(&self) -> &RenderedManifest {
        &self.state.manifest
    }
}

impl Deployment<Failed> {
    pub fn manifest(&self) -> &RenderedManifest {
        &self.state.manifest
    }
}
