// ABOUTME: Append-only version ledger of built images.
// ABOUTME: Insertion order is build order; lookups never reorder the stored sequence.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::VersionTag;

/// One built and pushed image, with its release note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVersion {
    pub tag: VersionTag,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("version {0} is already recorded")]
    DuplicateTag(VersionTag),

    #[error("no version has been built yet")]
    Empty,

    #[error("version {0} not found")]
    NotFound(String),

    #[error("no version was built before {0}")]
    NoPrevious(String),
}

/// Ordered sequence of builds, persisted as the document's `version` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionLedger(Vec<BuildVersion>);

impl VersionLedger {
    pub fn new(versions: Vec<BuildVersion>) -> Self {
        Self(versions)
    }

    /// Record a new build at the end of the ledger.
    pub fn append(&mut self, tag: VersionTag, message: String) -> Result<&BuildVersion, LedgerError> {
        if self.0.iter().any(|v| v.tag == tag) {
            return Err(LedgerError::DuplicateTag(tag));
        }
        self.0.push(BuildVersion { tag, message });
        Ok(&self.0[self.0.len() - 1])
    }

    /// The requested version, or the most recent build when `requested` is `None`.
    pub fn resolve(&self, requested: Option<&str>) -> Result<&BuildVersion, LedgerError> {
        match requested {
            None => self.latest().ok_or(LedgerError::Empty),
            Some(tag) => {
                if self.0.is_empty() {
                    return Err(LedgerError::Empty);
                }
                self.0
                    .iter()
                    .find(|v| v.tag == *tag)
                    .ok_or_else(|| LedgerError::NotFound(tag.to_string()))
            }
        }
    }

    /// The build immediately preceding `tag` in tag (= chronological) order.
    ///
    /// Sorts a copy of the ledger; the stored order is left untouched.
    pub fn previous(&self, tag: &str) -> Result<BuildVersion, LedgerError> {
        if self.0.is_empty() {
            return Err(LedgerError::Empty);
        }

        let mut sorted: Vec<&BuildVersion> = self.0.iter().collect();
        sorted.sort_by(|a, b| a.tag.cmp(&b.tag));

        let position = sorted
            .iter()
            .position(|v| v.tag == *tag)
            .ok_or_else(|| LedgerError::NotFound(tag.to_string()))?;

        position
            .checked_sub(1)
            .map(|index| sorted[index].clone())
            .ok_or_else(|| LedgerError::NoPrevious(tag.to_string()))
    }

    /// Most recently appended build.
    pub fn latest(&self) -> Option<&BuildVersion> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildVersion> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
