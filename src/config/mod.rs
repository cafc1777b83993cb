// ABOUTME: The persisted project document (.kubeb/config.yml) and its stores.
// ABOUTME: Every mutation is a read-modify-write of the whole document.

mod assignments;
mod deserialize;
mod init;
mod layout;
mod store;

pub use assignments::{parse_assignment, parse_assignments};
pub use init::{ProjectSpec, destroy_project, init_project};
pub use layout::{CONFIG_DIR, CONFIG_FILENAME, ProjectLayout, VALUES_FILENAME};
pub use store::{ConfigStore, FileStore, MemoryStore};

use deserialize::{deserialize_image_name, deserialize_release_name};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::ledger::VersionLedger;
use crate::types::{ImageName, ReleaseName, VersionTag};

/// A named variable overlay applied when rendering manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl Environment {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            variables: BTreeMap::new(),
        }
    }
}

/// Aggregate root of a project: everything kubeb persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Release name used with the release driver.
    #[serde(deserialize_with = "deserialize_release_name")]
    pub name: ReleaseName,

    #[serde(deserialize_with = "deserialize_image_name")]
    pub image: ImageName,

    pub template: String,

    /// Whether `template` is a user template from the ext-templates directory.
    #[serde(default)]
    pub ext_template: bool,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub environments: BTreeMap<String, Environment>,

    #[serde(default)]
    pub current_environment: Option<String>,

    #[serde(default)]
    pub version: VersionLedger,

    #[serde(default)]
    pub last_deploy_version: Option<VersionTag>,

    /// `--set` options of the last real (non dry-run) deploy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deploy_options: Option<BTreeMap<String, String>>,

    /// Passed to the release driver as its wait timeout.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "humantime_serde"
    )]
    pub install_timeout: Option<Duration>,
}

impl ProjectConfig {
    /// Fresh document for a newly initialized project.
    pub fn new(spec: &ProjectSpec, template: &str, ext_template: bool) -> Self {
        let mut environments = BTreeMap::new();
        environments.insert(spec.env.clone(), Environment::new(&spec.env));

        Self {
            name: spec.name.clone(),
            image: spec.image.clone(),
            template: template.to_string(),
            ext_template,
            user: spec.user.clone(),
            environments,
            current_environment: Some(spec.env.clone()),
            version: VersionLedger::default(),
            last_deploy_version: None,
            last_deploy_options: None,
            install_timeout: None,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::from)
    }

    /// Name of the current environment.
    pub fn current_environment(&self) -> Result<&str> {
        self.current_environment
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("no current environment selected".to_string()))
    }
}
