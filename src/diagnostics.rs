// ABOUTME: Non-fatal problems noticed while a workflow runs.
// ABOUTME: The orchestrator records them; commands print them after the result.

use std::fmt;

/// Warnings gathered during one workflow, in the order they happened.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning. It is logged immediately and kept for the report.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The env file copied into the chart could not be removed.
    pub fn manifest_cleanup(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ManifestCleanup, message)
    }

    /// A failed install had no revision to roll back to.
    pub fn rollback_unavailable(message: impl Into<String>) -> Self {
        Self::new(WarningKind::RollbackUnavailable, message)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    ManifestCleanup,
    RollbackUnavailable,
}
