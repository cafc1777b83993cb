// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers a non-zero install status and a driver that could not run.

use crate::driver::{CommandStatus, DriverError};

/// Why an install did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("install failed with exit status {status}")]
    InstallFailed { status: CommandStatus },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl DeployError {
    /// Process exit code, mirroring the driver's status where there is one.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::InstallFailed { status } => status.exit_code(),
            DeployError::Driver(_) => 1,
        }
    }
}
