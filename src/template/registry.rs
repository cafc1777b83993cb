// ABOUTME: Locates built-in and user templates under the kubeb home directory.
// ABOUTME: KUBEB_HOME (default ~/.kubeb) holds templates/ and ext-templates/.

use std::path::{Path, PathBuf};

use super::{Template, copy_dir};
use crate::error::{Error, Result};

pub const HOME_ENV: &str = "KUBEB_HOME";
pub const BUILTIN_DIR: &str = "templates";
pub const EXTERNAL_DIR: &str = "ext-templates";

/// Template directories known to kubeb.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    builtin_dir: PathBuf,
    external_dir: PathBuf,
}

impl TemplateRegistry {
    pub fn new(home: &Path) -> Self {
        Self {
            builtin_dir: home.join(BUILTIN_DIR),
            external_dir: home.join(EXTERNAL_DIR),
        }
    }

    /// Registry rooted at `$KUBEB_HOME`, or `$HOME/.kubeb` when unset.
    pub fn from_env() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(Path::new(&home)));
        }
        let user_home = std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                Error::InvalidConfig(format!("neither {HOME_ENV} nor HOME is set"))
            })?;
        Ok(Self::new(&Path::new(&user_home).join(".kubeb")))
    }

    pub fn external_dir(&self) -> &Path {
        &self.external_dir
    }

    /// Resolve a template name. User templates shadow built-in ones.
    pub fn resolve(&self, name: &str) -> Result<Template> {
        if !name.is_empty() && self.external_dir.join(name).is_dir() {
            return Ok(Template::External(name.to_string()));
        }
        match Template::builtin(name) {
            Some(template) if self.builtin_dir.join(name).is_dir() => Ok(template),
            _ => Err(Error::TemplateNotFound(name.to_string())),
        }
    }

    /// Directory holding the template's files.
    pub fn dir(&self, template: &Template) -> PathBuf {
        match template {
            Template::External(name) => self.external_dir.join(name),
            builtin => self.builtin_dir.join(builtin.name()),
        }
    }

    /// Whether a template of this name exists in either location.
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Copy `source` into the user template directory as `name`.
    pub fn add_external(&self, name: &str, source: &Path, force: bool) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::InvalidConfig(format!("invalid template name: '{name}'")));
        }
        if !source.is_dir() {
            return Err(Error::InvalidConfig(format!(
                "template source is not a directory: {}",
                source.display()
            )));
        }

        let target = self.external_dir.join(name);
        if self.exists(name) && !force {
            return Err(Error::AlreadyExists(target));
        }
        if target.is_dir() {
            std::fs::remove_dir_all(&target)?;
        }

        copy_dir(source, &target)?;
        tracing::info!("Added template {} from {}", name, source.display());
        Ok(target)
    }
}
