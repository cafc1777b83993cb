// ABOUTME: Recording fakes for the image builder, manifest renderer and release driver.
// ABOUTME: Statuses are scripted per test; every call is recorded for assertions.

use async_trait::async_trait;
use kubeb::driver::{
    CommandStatus, DriverError, History, HistoryEntry, ImageBuilder, InstallOutput, InstallRequest,
    ManifestRenderer, ReleaseDriver, RenderError, RenderRequest, RenderedManifest,
};
use kubeb::types::{ImageName, ReleaseName, Revision, VersionTag};
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

pub fn status(code: i32) -> CommandStatus {
    CommandStatus::from_code(Some(code))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderCall {
    Build(String),
    Push(String),
}

/// Image builder returning scripted statuses.
pub struct FakeBuilder {
    build_status: CommandStatus,
    push_status: CommandStatus,
    calls: Mutex<Vec<BuilderCall>>,
}

impl FakeBuilder {
    pub fn succeeding() -> Self {
        Self::with_statuses(CommandStatus::SUCCESS, CommandStatus::SUCCESS)
    }

    pub fn with_statuses(build_status: CommandStatus, push_status: CommandStatus) -> Self {
        Self {
            build_status,
            push_status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<BuilderCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ImageBuilder for FakeBuilder {
    async fn build(
        &self,
        image: &ImageName,
        tag: &VersionTag,
        _context: &Path,
    ) -> Result<CommandStatus, DriverError> {
        self.calls
            .lock()
            .push(BuilderCall::Build(image.tagged(tag)));
        Ok(self.build_status)
    }

    async fn push(&self, image: &ImageName, tag: &VersionTag) -> Result<CommandStatus, DriverError> {
        self.calls.lock().push(BuilderCall::Push(image.tagged(tag)));
        Ok(self.push_status)
    }
}

/// Renderer that writes nothing and records what it was asked to render.
#[derive(Default)]
pub struct FakeRenderer {
    rendered: Mutex<Vec<(VersionTag, BTreeMap<String, String>)>>,
    cleanups: Mutex<usize>,
}

impl FakeRenderer {
    pub fn rendered(&self) -> Vec<(VersionTag, BTreeMap<String, String>)> {
        self.rendered.lock().clone()
    }

    pub fn cleanups(&self) -> usize {
        *self.cleanups.lock()
    }
}

impl ManifestRenderer for FakeRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedManifest, RenderError> {
        self.rendered
            .lock()
            .push((request.tag.clone(), request.variables.clone()));
        Ok(RenderedManifest {
            values_file: PathBuf::from(".kubeb/helm-values.yml"),
            chart_dir: PathBuf::from(".kubeb").join(request.template.name()),
            env_copy: None,
        })
    }

    fn cleanup(&self, _manifest: &RenderedManifest) -> std::io::Result<()> {
        *self.cleanups.lock() += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Install {
        release: String,
        dry_run: bool,
        options: BTreeMap<String, String>,
    },
    Uninstall(String),
    History(String),
    Rollback(String, Revision),
}

/// Release driver returning scripted statuses and history.
pub struct FakeDriver {
    install_statuses: Mutex<VecDeque<CommandStatus>>,
    history: Mutex<History>,
    rollback_status: CommandStatus,
    uninstall_status: CommandStatus,
    calls: Mutex<Vec<DriverCall>>,
}

impl FakeDriver {
    pub fn succeeding() -> Self {
        Self {
            install_statuses: Mutex::new(VecDeque::new()),
            history: Mutex::new(History {
                status: CommandStatus::SUCCESS,
                entries: Vec::new(),
            }),
            rollback_status: CommandStatus::SUCCESS,
            uninstall_status: CommandStatus::SUCCESS,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue install statuses; once drained, installs succeed.
    pub fn with_install_statuses(self, statuses: impl IntoIterator<Item = CommandStatus>) -> Self {
        *self.install_statuses.lock() = statuses.into_iter().collect();
        self
    }

    /// History with one entry per `(revision, status)`.
    pub fn with_history(self, entries: &[(u32, &str)]) -> Self {
        self.history.lock().entries = entries
            .iter()
            .map(|(revision, status)| HistoryEntry {
                revision: Revision::new(*revision),
                status: status.to_string(),
                updated: String::new(),
                chart: String::new(),
                app_version: String::new(),
                description: String::new(),
            })
            .collect();
        self
    }

    pub fn with_history_status(self, status: CommandStatus) -> Self {
        self.history.lock().status = status;
        self
    }

    pub fn with_rollback_status(mut self, status: CommandStatus) -> Self {
        self.rollback_status = status;
        self
    }

    pub fn with_uninstall_status(mut self, status: CommandStatus) -> Self {
        self.uninstall_status = status;
        self
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().clone()
    }

    pub fn rollbacks(&self) -> Vec<Revision> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::Rollback(_, revision) => Some(revision),
                _ => None,
            })
            .collect()
    }

    pub fn installs(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, DriverCall::Install { .. }))
            .count()
    }
}

#[async_trait]
impl ReleaseDriver for FakeDriver {
    async fn install(&self, request: &InstallRequest<'_>) -> Result<InstallOutput, DriverError> {
        self.calls.lock().push(DriverCall::Install {
            release: request.release.to_string(),
            dry_run: request.dry_run,
            options: request.options.clone(),
        });
        let status = self
            .install_statuses
            .lock()
            .pop_front()
            .unwrap_or(CommandStatus::SUCCESS);
        Ok(InstallOutput {
            status,
            rendered: request
                .dry_run
                .then(|| format!("# release {}", request.release)),
        })
    }

    async fn uninstall(&self, release: &ReleaseName) -> Result<CommandStatus, DriverError> {
        self.calls
            .lock()
            .push(DriverCall::Uninstall(release.to_string()));
        Ok(self.uninstall_status)
    }

    async fn history(&self, release: &ReleaseName) -> Result<History, DriverError> {
        self.calls.lock().push(DriverCall::History(release.to_string()));
        Ok(self.history.lock().clone())
    }

    async fn rollback(
        &self,
        release: &ReleaseName,
        revision: Revision,
    ) -> Result<CommandStatus, DriverError> {
        self.calls
            .lock()
            .push(DriverCall::Rollback(release.to_string(), revision));
        Ok(self.rollback_status)
    }
}
