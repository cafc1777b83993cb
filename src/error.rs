// ABOUTME: Application-wide error types for kubeb.
// ABOUTME: Uses thiserror; every variant is reported once at the CLI boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::{DeployError, RollbackOutcome};
use crate::driver::{CommandStatus, DriverError, Phase, RenderError};
use crate::ledger::LedgerError;
use crate::types::VersionTag;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("kubeb config file not found in {0}, run `kubeb init` first")]
    ConfigurationMissing(PathBuf),

    #[error("kubeb template not found: {0}")]
    TemplateNotFound(String),

    #[error("no deployable version found: {0}")]
    NoDeployableVersion(String),

    #[error("environment file not found: {0}")]
    EnvironmentFileMissing(PathBuf),

    #[error("version tag already recorded: {0}")]
    DuplicateTag(VersionTag),

    #[error("{phase} failed with exit status {status}")]
    ExternalCommandFailed { phase: Phase, status: CommandStatus },

    #[error("deploying {tag} failed: {source} ({rollback})")]
    DeployFailed {
        tag: VersionTag,
        source: DeployError,
        rollback: RollbackOutcome,
    },

    #[error("no superseded revision available to roll back to")]
    RollbackUnavailable,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("interactive prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Render(RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Failed external commands pass their own status through; everything
    /// else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ExternalCommandFailed { status, .. } => status.exit_code(),
            Error::DeployFailed { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::MissingEnvFile(path) => Error::EnvironmentFileMissing(path),
            other => Error::Render(other),
        }
    }
}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateTag(tag) => Error::DuplicateTag(tag),
            other => Error::NoDeployableVersion(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
