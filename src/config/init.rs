// ABOUTME: Project scaffolding for `kubeb init` and teardown for `kubeb destroy`.
// ABOUTME: Generates .kubeb/config.yml plus the chosen template's files.

use crate::error::{Error, Result};
use crate::template::TemplateRegistry;
use crate::types::{ImageName, ReleaseName};

use super::{ConfigStore, FileStore, ProjectConfig, ProjectLayout};

/// Answers collected by `kubeb init`.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub name: ReleaseName,
    pub user: String,
    pub image: ImageName,
    /// Initial environment, which becomes the current one.
    pub env: String,
}

/// Initialize a project in `layout` from the named template.
///
/// Refuses to replace an existing config unless `force` is set; a forced
/// init wipes `.kubeb/` first, ledger included.
pub fn init_project(
    layout: &ProjectLayout,
    registry: &TemplateRegistry,
    spec: &ProjectSpec,
    template: &str,
    force: bool,
) -> Result<ProjectConfig> {
    let store = FileStore::new(layout.clone());
    if store.exists() && !force {
        return Err(Error::AlreadyExists(store.path()));
    }

    let template = registry.resolve(template)?;

    destroy_project(layout)?;
    let config = template.scaffold(registry, spec, layout)?;
    store.save(&config)?;

    tracing::info!(
        "Initialized {} with template {} in {}",
        config.name,
        template,
        layout.config_dir().display()
    );
    Ok(config)
}

/// Remove the `.kubeb/` directory. Returns whether anything was removed.
pub fn destroy_project(layout: &ProjectLayout) -> Result<bool> {
    let dir = layout.config_dir();
    if !dir.is_dir() {
        return Ok(false);
    }
    std::fs::remove_dir_all(&dir)?;
    Ok(true)
}
