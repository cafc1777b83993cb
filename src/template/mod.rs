// ABOUTME: Project templates and the scaffolding each one performs on `init`.
// ABOUTME: Templates are an explicit enum; unknown names are a typed error.

mod registry;

pub use registry::{BUILTIN_DIR, EXTERNAL_DIR, HOME_ENV, TemplateRegistry};

use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{ProjectConfig, ProjectLayout, ProjectSpec};
use crate::environment::EnvironmentManager;
use crate::error::{Error, Result};

/// Files a template directory may contain.
pub const DOTENV_FILE: &str = "dotenv";
pub const VALUES_TEMPLATE: &str = "helm-values.yaml";
const DOCKERFILE: &str = "Dockerfile";
const DOCKERIGNORE: &str = ".dockerignore";
const DOCKER_SUPPORT_DIR: &str = "docker";

/// A project template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// PHP Laravel application; also ships web server configs under `docker/`.
    Laravel,
    /// Podder pipeline service.
    PodderPipeline,
    /// Podder task bean.
    PodderTaskBean,
    /// User template added with `kubeb template`.
    External(String),
}

impl Template {
    /// Built-in template for a name, if there is one.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "laravel" => Some(Template::Laravel),
            "podder-pipeline" => Some(Template::PodderPipeline),
            "podder-task-bean" => Some(Template::PodderTaskBean),
            _ => None,
        }
    }

    /// Template recorded in a project document.
    pub fn from_config(name: &str, external: bool) -> Result<Self> {
        if external {
            return Ok(Template::External(name.to_string()));
        }
        Template::builtin(name).ok_or_else(|| Error::TemplateNotFound(name.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            Template::Laravel => "laravel",
            Template::PodderPipeline => "podder-pipeline",
            Template::PodderTaskBean => "podder-task-bean",
            Template::External(name) => name,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Template::External(_))
    }

    /// Extra directories copied verbatim into the project root.
    fn support_dirs(&self) -> &'static [&'static str] {
        match self {
            Template::Laravel => &[DOCKER_SUPPORT_DIR],
            _ => &[],
        }
    }

    /// Generate the project files for this template and return the new document.
    ///
    /// Writes the config document, seeds the environment file, copies the
    /// Dockerfile and the Helm chart (`<template>/<template>` into
    /// `.kubeb/<template>`).
    pub fn scaffold(
        &self,
        registry: &TemplateRegistry,
        spec: &ProjectSpec,
        layout: &ProjectLayout,
    ) -> Result<ProjectConfig> {
        let template_dir = registry.dir(self);
        if !template_dir.is_dir() {
            return Err(Error::TemplateNotFound(self.name().to_string()));
        }

        std::fs::create_dir_all(layout.config_dir())?;
        let mut config = ProjectConfig::new(spec, self.name(), self.is_external());

        let environments = EnvironmentManager::new(layout.clone());
        let seed = template_dir.join(DOTENV_FILE);
        environments.select(&mut config, &spec.env, Some(&seed))?;
        environments.set_current(&mut config, &spec.env);

        for file in [DOCKERFILE, DOCKERIGNORE] {
            let source = template_dir.join(file);
            if source.is_file() {
                std::fs::copy(&source, layout.root().join(file))?;
            }
        }

        for dir in self.support_dirs() {
            let source = template_dir.join(dir);
            if source.is_dir() {
                copy_dir(&source, &layout.root().join(dir))?;
            }
        }

        let chart = template_dir.join(self.name());
        if chart.is_dir() {
            copy_dir(&chart, &layout.chart_dir(self.name()))?;
        } else {
            tracing::warn!("Template {} has no chart directory", self.name());
        }

        Ok(config)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recursively copy a directory tree.
pub(crate) fn copy_dir(source: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        let destination: PathBuf = target.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}
