// ABOUTME: Rollback to the last known-good revision of a release.
// ABOUTME: Used automatically after a failed install and by `kubeb rollback`.

use std::fmt;

use crate::driver::{CommandStatus, HistoryEntry, Phase, ReleaseDriver};
use crate::error::{Error, Result};
use crate::types::{ReleaseName, Revision};

/// What happened to the automatic rollback after a failed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// Not attempted: dry run, or disabled by the caller.
    Skipped,
    /// The release history has no superseded revision.
    Unavailable,
    /// The driver was asked to roll back.
    Attempted {
        revision: Revision,
        status: CommandStatus,
    },
    /// The history query failed, or the rollback command could not be run.
    Aborted(String),
}

impl RollbackOutcome {
    /// Whether the release is back on a working revision.
    pub fn restored(&self) -> bool {
        matches!(self, RollbackOutcome::Attempted { status, .. } if status.success())
    }
}

impl fmt::Display for RollbackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackOutcome::Skipped => f.write_str("rollback skipped"),
            RollbackOutcome::Unavailable => f.write_str("no superseded revision to roll back to"),
            RollbackOutcome::Attempted { revision, status } if status.success() => {
                write!(f, "rolled back to revision {revision}")
            }
            RollbackOutcome::Attempted { revision, status } => {
                write!(f, "rollback to revision {revision} failed with exit status {status}")
            }
            RollbackOutcome::Aborted(reason) => write!(f, "rollback aborted: {reason}"),
        }
    }
}

/// Highest revision the driver marked as superseded.
///
/// A superseded revision is one that ran successfully until a newer
/// release replaced it, so the highest one is the last known-good state.
pub fn select_rollback_revision(entries: &[HistoryEntry]) -> Option<Revision> {
    entries
        .iter()
        .filter(|entry| entry.is_superseded())
        .map(|entry| entry.revision)
        .max()
}

/// Query the release history for the last known-good revision.
///
/// # Errors
///
/// Returns `Error::ExternalCommandFailed` if the history query exits
/// non-zero, so it is not mistaken for a history without candidates.
pub async fn last_known_good<D: ReleaseDriver + ?Sized>(
    driver: &D,
    release: &ReleaseName,
) -> Result<Option<Revision>> {
    let history = driver.history(release).await?;
    if !history.status.success() {
        return Err(Error::ExternalCommandFailed {
            phase: Phase::History,
            status: history.status,
        });
    }
    Ok(select_rollback_revision(&history.entries))
}

/// Manual rollback to `revision`, or to the last known-good revision.
///
/// # Errors
///
/// Returns `Error::RollbackUnavailable` if no revision was given and the
/// history has none to offer, and `Error::ExternalCommandFailed` if the
/// history query or the rollback exits non-zero.
pub async fn manual_rollback<D: ReleaseDriver + ?Sized>(
    driver: &D,
    release: &ReleaseName,
    revision: Option<Revision>,
) -> Result<Revision> {
    let revision = match revision {
        Some(revision) => revision,
        None => last_known_good(driver, release)
            .await?
            .ok_or(Error::RollbackUnavailable)?,
    };

    tracing::info!("Rolling {} back to revision {}", release, revision);
    let status = driver.rollback(release, revision).await?;
    if !status.success() {
        return Err(Error::ExternalCommandFailed {
            phase: Phase::Rollback,
            status,
        });
    }
    Ok(revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(revision: u32, status: &str) -> HistoryEntry {
        HistoryEntry {
            revision: Revision::new(revision),
            status: status.to_string(),
            updated: String::new(),
            chart: String::new(),
            app_version: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn selects_highest_superseded_revision() {
        let entries = [
            entry(1, "superseded"),
            entry(3, "superseded"),
            entry(2, "superseded"),
            entry(4, "failed"),
        ];
        assert_eq!(select_rollback_revision(&entries), Some(Revision::new(3)));
    }

    #[test]
    fn ignores_deployed_and_failed_revisions() {
        let entries = [entry(5, "deployed"), entry(6, "failed")];
        assert_eq!(select_rollback_revision(&entries), None);
    }

    #[test]
    fn superseded_status_is_case_insensitive() {
        let entries = [entry(2, "Superseded"), entry(1, "superseded")];
        assert_eq!(select_rollback_revision(&entries), Some(Revision::new(2)));
    }

    #[test]
    fn outcome_messages() {
        let restored = RollbackOutcome::Attempted {
            revision: Revision::new(3),
            status: CommandStatus::SUCCESS,
        };
        assert!(restored.restored());
        assert_eq!(restored.to_string(), "rolled back to revision 3");

        let rejected = RollbackOutcome::Attempted {
            revision: Revision::new(3),
            status: CommandStatus::from_code(Some(1)),
        };
        assert!(!rejected.restored());
        assert!(rejected.to_string().contains("failed with exit status 1"));

        assert!(!RollbackOutcome::Unavailable.restored());
    }
}
