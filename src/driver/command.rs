// ABOUTME: Runs external tools (docker, helm) and captures their exit status.
// ABOUTME: Exit status is the only failure signal; output is kept for reporting.

use snafu::ResultExt;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::error::{DriverError, SpawnSnafu};

/// Workflow phase an external command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Build,
    Push,
    Install,
    Uninstall,
    History,
    Rollback,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Build => "image build",
            Phase::Push => "image push",
            Phase::Install => "install",
            Phase::Uninstall => "uninstall",
            Phase::History => "history",
            Phase::Rollback => "rollback",
        };
        f.write_str(name)
    }
}

/// Exit status of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus(Option<i32>);

impl CommandStatus {
    pub const SUCCESS: CommandStatus = CommandStatus(Some(0));

    /// Status from a raw exit code; `None` means the process was killed by a signal.
    pub fn from_code(code: Option<i32>) -> Self {
        Self(code)
    }

    pub fn success(&self) -> bool {
        self.0 == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.0
    }

    /// Code to exit the kubeb process with when this status is a failure.
    pub fn exit_code(&self) -> i32 {
        match self.0 {
            Some(code) if (0..=255).contains(&code) => code,
            _ => 1,
        }
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self(status.code())
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// Result of running an external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: CommandStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Spawns one external program in a fixed working directory.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
    workdir: PathBuf,
}

impl CommandRunner {
    pub fn new(program: impl Into<PathBuf>, workdir: &Path) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.to_path_buf(),
        }
    }

    /// Runner for `default_program`, overridable through the environment
    /// variable `env_var` (e.g. `KUBEB_HELM=/opt/helm3/helm`).
    pub fn from_env(env_var: &str, default_program: &str, workdir: &Path) -> Self {
        let program = std::env::var_os(env_var)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default_program));
        Self::new(program, workdir)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the program to completion and capture its output.
    ///
    /// Waits as long as the program runs; timeouts are the program's concern.
    pub async fn run<I, S>(&self, phase: Phase, args: I) -> Result<CommandOutput, DriverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        tracing::debug!(
            "Running {}: {} {}",
            phase,
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(SpawnSnafu {
                phase,
                program: self.program.display().to_string(),
            })?;

        let result = CommandOutput {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if result.success() {
            tracing::info!("{} completed successfully", phase);
        } else {
            tracing::warn!("{} failed with exit status {}", phase, result.status);
            if !result.stderr.trim().is_empty() {
                tracing::warn!("{}", result.stderr.trim_end());
            }
        }

        Ok(result)
    }
}
