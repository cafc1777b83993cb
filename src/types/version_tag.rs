// ABOUTME: Immutable build version tags derived from build time.
// ABOUTME: Tags are `v` followed by Unix milliseconds, so tag order is build order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one built image, recorded in the version ledger.
///
/// Not interchangeable with [`Revision`](super::Revision), which numbers
/// releases inside the release driver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate the tag for a build happening at `now`.
    ///
    /// If the clock does not move past the latest recorded tag (same
    /// millisecond, clock skew) the latest tag's timestamp plus one is used,
    /// so generated tags sort after existing ones. At `i64::MAX` the latest
    /// tag itself is returned and the ledger rejects it as a duplicate.
    pub fn generate(now: DateTime<Utc>, latest: Option<&VersionTag>) -> Self {
        let mut millis = now.timestamp_millis();
        if let Some(previous) = latest.and_then(VersionTag::millis)
            && millis <= previous
        {
            millis = previous.saturating_add(1);
        }
        Self(format!("v{millis}"))
    }

    /// Build timestamp encoded in the tag, if it is a generated tag.
    pub fn millis(&self) -> Option<i64> {
        self.0.strip_prefix('v')?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for VersionTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
