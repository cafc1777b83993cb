// ABOUTME: Driver error types with SNAFU pattern.
// ABOUTME: Covers failures to run external tools, not their exit statuses.

use snafu::Snafu;

use super::Phase;

/// Errors from invoking external tools.
///
/// A tool that runs and exits non-zero is not an error here: that is
/// reported through [`CommandStatus`](super::CommandStatus).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DriverError {
    #[snafu(display("failed to run `{program}` for {phase}: {source}"))]
    Spawn {
        phase: Phase,
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("failed to parse release history: {source}"))]
    HistoryParse { source: serde_json::Error },
}

impl DriverError {
    /// The phase during which the error occurred, if known.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            DriverError::Spawn { phase, .. } => Some(*phase),
            DriverError::HistoryParse { .. } => Some(Phase::History),
        }
    }
}
