// ABOUTME: Image builder capability and its docker CLI implementation.
// ABOUTME: Builds and pushes `image:tag`; only the exit status is consulted.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;

use super::command::{CommandRunner, CommandStatus, Phase};
use super::error::DriverError;
use crate::types::{ImageName, VersionTag};

/// Builds container images and pushes them to a registry.
#[async_trait]
pub trait ImageBuilder: Send + Sync {
    /// Build `image:tag` from the given build context.
    async fn build(
        &self,
        image: &ImageName,
        tag: &VersionTag,
        context: &Path,
    ) -> Result<CommandStatus, DriverError>;

    /// Push `image:tag` to its registry.
    async fn push(&self, image: &ImageName, tag: &VersionTag)
    -> Result<CommandStatus, DriverError>;
}

/// [`ImageBuilder`] backed by the `docker` command line.
#[derive(Debug, Clone)]
pub struct DockerCli {
    runner: CommandRunner,
}

impl DockerCli {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    /// Docker CLI from `KUBEB_DOCKER`, falling back to `docker` on the PATH.
    pub fn from_env(workdir: &Path) -> Self {
        Self::new(CommandRunner::from_env("KUBEB_DOCKER", "docker", workdir))
    }
}

#[async_trait]
impl ImageBuilder for DockerCli {
    async fn build(
        &self,
        image: &ImageName,
        tag: &VersionTag,
        context: &Path,
    ) -> Result<CommandStatus, DriverError> {
        let reference = image.tagged(tag);
        let output = self
            .runner
            .run(
                Phase::Build,
                [
                    OsStr::new("build"),
                    OsStr::new("-t"),
                    OsStr::new(&reference),
                    context.as_os_str(),
                ],
            )
            .await?;
        Ok(output.status)
    }

    async fn push(
        &self,
        image: &ImageName,
        tag: &VersionTag,
    ) -> Result<CommandStatus, DriverError> {
        let reference = image.tagged(tag);
        let output = self.runner.run(Phase::Push, ["push", reference.as_str()]).await?;
        Ok(output.status)
    }
}
