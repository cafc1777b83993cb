// ABOUTME: Filesystem layout of a kubeb project.
// ABOUTME: Resolves the config document, rendered values, chart and env file paths.

use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".kubeb";
pub const CONFIG_FILENAME: &str = "config.yml";
pub const VALUES_FILENAME: &str = "helm-values.yml";

/// Paths of one project checkout, rooted at the directory kubeb runs in.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root; also the docker build context.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join(CONFIG_FILENAME)
    }

    /// Rendered Helm values for the next install.
    pub fn values_file(&self) -> PathBuf {
        self.config_dir().join(VALUES_FILENAME)
    }

    /// Helm chart copied from the template during `init`.
    pub fn chart_dir(&self, template: &str) -> PathBuf {
        self.config_dir().join(template)
    }

    /// Base variable file of an environment, e.g. `.env.staging`.
    pub fn env_file(&self, environment: &str) -> PathBuf {
        self.root.join(format!(".env.{environment}"))
    }
}
