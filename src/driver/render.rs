// ABOUTME: Manifest renderer capability and its Tera implementation.
// ABOUTME: Renders the template's helm-values.yaml for one version and environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

use crate::config::ProjectLayout;
use crate::template::{Template, TemplateRegistry, VALUES_TEMPLATE};
use crate::types::{ImageName, VersionTag};

/// Name of the environment file copied into the chart for the install.
pub const CHART_ENV_FILE: &str = "app.env";

/// Errors from rendering a manifest.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("environment file not found: {0}")]
    MissingEnvFile(PathBuf),

    #[error("values template not found: {0}")]
    MissingTemplate(PathBuf),

    #[error("failed to render values: {0}")]
    Template(#[from] tera::Error),

    #[error("failed to write manifest: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the renderer needs for one deploy.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub template: &'a Template,
    pub image: &'a ImageName,
    pub tag: &'a VersionTag,
    pub variables: &'a BTreeMap<String, String>,
    /// Base variable file of the current environment.
    pub env_file: &'a Path,
}

/// Files produced by a render, consumed by the release driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest {
    /// Rendered values file passed with `-f`.
    pub values_file: PathBuf,
    /// Chart directory to install.
    pub chart_dir: PathBuf,
    /// Temporary copy of the environment file inside the chart.
    pub env_copy: Option<PathBuf>,
}

/// Renders deployment manifests from templates.
pub trait ManifestRenderer: Send + Sync {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedManifest, RenderError>;

    /// Remove temporary files created by [`render`](Self::render).
    fn cleanup(&self, manifest: &RenderedManifest) -> std::io::Result<()> {
        if let Some(path) = &manifest.env_copy
            && path.is_file()
        {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// [`ManifestRenderer`] using Tera templates from the template registry.
#[derive(Debug, Clone)]
pub struct TeraRenderer {
    registry: TemplateRegistry,
    layout: ProjectLayout,
}

impl TeraRenderer {
    pub fn new(registry: TemplateRegistry, layout: ProjectLayout) -> Self {
        Self { registry, layout }
    }
}

impl ManifestRenderer for TeraRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedManifest, RenderError> {
        if !request.env_file.is_file() {
            return Err(RenderError::MissingEnvFile(request.env_file.to_path_buf()));
        }

        let template_path = self.registry.dir(request.template).join(VALUES_TEMPLATE);
        if !template_path.is_file() {
            return Err(RenderError::MissingTemplate(template_path));
        }
        let source = std::fs::read_to_string(&template_path)?;

        let mut context = Context::new();
        context.insert("image", &request.image.to_string());
        context.insert("tag", request.tag.as_str());
        context.insert("env", request.variables);

        let content = Tera::one_off(&source, &context, false)?;

        let values_file = self.layout.values_file();
        std::fs::create_dir_all(self.layout.config_dir())?;
        std::fs::write(&values_file, content)?;
        tracing::info!("Generated helm values in {}", values_file.display());

        let chart_dir = self.layout.chart_dir(request.template.name());
        let env_copy = if chart_dir.is_dir() {
            let target = chart_dir.join(CHART_ENV_FILE);
            std::fs::copy(request.env_file, &target)?;
            Some(target)
        } else {
            None
        };

        Ok(RenderedManifest {
            values_file,
            chart_dir,
            env_copy,
        })
    }
}
