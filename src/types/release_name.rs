// ABOUTME: Helm-compatible release name validation.
// ABOUTME: Release names are lowercase RFC 1123 labels of at most 53 characters.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Helm stores release metadata in object names with a suffix, so it caps
/// release names below the 63-character label limit.
pub const MAX_RELEASE_NAME_LEN: usize = 53;

#[derive(Debug, Error)]
pub enum ReleaseNameError {
    #[error("release name cannot be empty")]
    Empty,

    #[error("release name exceeds maximum length of {MAX_RELEASE_NAME_LEN} characters")]
    TooLong,

    #[error("release name must start and end with a lowercase letter or digit")]
    BadBoundary,

    #[error("release name must be lowercase")]
    NotLowercase,

    #[error("invalid character in release name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseName(String);

impl ReleaseName {
    pub fn new(value: &str) -> Result<Self, ReleaseNameError> {
        if value.is_empty() {
            return Err(ReleaseNameError::Empty);
        }

        if value.len() > MAX_RELEASE_NAME_LEN {
            return Err(ReleaseNameError::TooLong);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(ReleaseNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                return Err(ReleaseNameError::InvalidChar(c));
            }
        }

        let boundary_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
        if !boundary_ok(value.chars().next()) || !boundary_ok(value.chars().last()) {
            return Err(ReleaseNameError::BadBoundary);
        }

        Ok(Self(value.to_string()))
    }

    /// Derive a release name from a directory name, lowercasing it and
    /// replacing characters Helm rejects with hyphens.
    pub fn from_dir_name(dir: &str) -> Result<Self, ReleaseNameError> {
        let sanitized: String = dir
            .to_ascii_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        let trimmed = sanitized.trim_matches(|c: char| c == '-' || c == '.');
        let truncated: String = trimmed.chars().take(MAX_RELEASE_NAME_LEN).collect();
        Self::new(truncated.trim_end_matches(['-', '.']))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ReleaseName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
