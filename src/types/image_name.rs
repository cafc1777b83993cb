// ABOUTME: Container image repository names (without a tag).
// ABOUTME: Tags come from the version ledger and are appended with `tagged`.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::VersionTag;

#[derive(Debug, Error)]
pub enum ParseImageNameError {
    #[error("image name cannot be empty")]
    Empty,

    #[error("invalid character in image name: {0}")]
    InvalidChar(char),

    #[error("image name must not carry a tag or digest: {0}")]
    HasTag(String),
}

/// An image repository such as `acme/app` or `registry.example.com:5000/acme/app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    registry: Option<String>,
    repository: String,
}

impl ImageName {
    pub fn parse(input: &str) -> Result<Self, ParseImageNameError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageNameError::Empty);
        }

        for c in input.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_' | '@') {
                return Err(ParseImageNameError::InvalidChar(c));
            }
        }

        if input.contains('@') {
            return Err(ParseImageNameError::HasTag(input.to_string()));
        }

        // A colon after the last slash is a tag; one before it is a registry port.
        let last_segment = input.rsplit('/').next().unwrap_or(input);
        if last_segment.contains(':') {
            return Err(ParseImageNameError::HasTag(input.to_string()));
        }

        let (registry, repository) = match input.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (Some(first.to_string()), rest.to_string())
            }
            _ => (None, input.to_string()),
        };

        Ok(Self {
            registry,
            repository,
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Full reference for a ledger version, e.g. `acme/app:v1700000000000`.
    pub fn tagged(&self, tag: &VersionTag) -> String {
        format!("{}:{}", self, tag)
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.repository)
    }
}

impl Serialize for ImageName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
